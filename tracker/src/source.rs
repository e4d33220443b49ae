//! Source URL selection and best-effort validation

use crate::origin::{Origin, OriginFetchError};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid source URL '{candidate}'")]
    InvalidSourceUrl {
        candidate: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Source '{url}' is unreachable: {reason}")]
    SourceUnreachable { url: Url, reason: Unreachable },
}

#[derive(Debug, Error)]
pub enum Unreachable {
    #[error("request failed")]
    Request(#[source] OriginFetchError),
    #[error("status {0}")]
    Status(u16),
    #[error("content type '{0}' is not text")]
    ContentType(String),
}

/// Checks that `candidate` is a URL serving textual data.
///
/// Advisory only, the source may still fail on a later full fetch.
pub async fn validate_source<O: Origin>(origin: &O, candidate: &str) -> Result<Url, SourceError> {
    let url = Url::parse(candidate.trim()).map_err(|source| SourceError::InvalidSourceUrl {
        candidate: candidate.to_owned(),
        source,
    })?;

    let reason = match origin.probe(&url).await {
        Err(e) => Unreachable::Request(e),
        Ok(p) if !p.is_success() => Unreachable::Status(p.status),
        Ok(p) if !p.is_textual() => Unreachable::ContentType(p.content_type.unwrap_or_default()),
        Ok(_) => return Ok(url),
    };
    warn!(url = %url, %reason, "Rejected source");
    Err(SourceError::SourceUnreachable { url, reason })
}

/// The active source plus a candidate buffer that is only promoted once
/// it validates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSelection {
    active: Url,
    candidate: String,
}

impl SourceSelection {
    pub fn new(active: Url) -> Self {
        let candidate = active.to_string();
        SourceSelection { active, candidate }
    }

    pub fn active(&self) -> &Url {
        &self.active
    }

    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    pub fn set_candidate(&mut self, candidate: impl Into<String>) {
        self.candidate = candidate.into();
    }

    /// Validate the candidate and make it the active source
    pub async fn submit<O: Origin>(&mut self, origin: &O) -> Result<&Url, SourceError> {
        let url = validate_source(origin, &self.candidate).await?;
        info!(source = %url, "Source selected");
        self.active = url;
        Ok(&self.active)
    }
}
