//! Network access to element-set sources

use reqwest::header::CONTENT_TYPE;
use std::{future::Future, time::Duration};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum OriginFetchError {
    #[error("Origin '{url}' responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("Request to origin '{url}' failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Response metadata from a HEAD request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Probe {
    pub status: u16,
    pub content_type: Option<String>,
}

impl Probe {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Element-set sources serve `text/plain`, but some only say `text/...`
    pub fn is_textual(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("text") || ct.contains("plain"))
            .unwrap_or(false)
    }
}

pub trait Origin: Send + Sync + 'static {
    /// Full fetch of the source text
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, OriginFetchError>> + Send;

    /// Metadata-only request
    fn probe(&self, url: &Url) -> impl Future<Output = Result<Probe, OriginFetchError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpOrigin {
    client: reqwest::Client,
}

impl HttpOrigin {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpOrigin { client })
    }
}

impl Origin for HttpOrigin {
    async fn fetch(&self, url: &str) -> Result<String, OriginFetchError> {
        let transport = |source| OriginFetchError::Transport {
            url: url.to_owned(),
            source,
        };

        debug!(url, "Fetching from origin");
        let resp = self.client.get(url).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(OriginFetchError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        resp.text().await.map_err(transport)
    }

    async fn probe(&self, url: &Url) -> Result<Probe, OriginFetchError> {
        let resp = self
            .client
            .head(url.clone())
            .send()
            .await
            .map_err(|source| OriginFetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Ok(Probe {
            status: resp.status().as_u16(),
            content_type,
        })
    }
}
