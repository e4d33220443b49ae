//! Cache-aside proxy in front of an element-set origin.
//!
//! Concurrent misses for the same key are not de-duplicated: each one
//! fetches the origin and the last write wins.

use crate::{
    origin::{Origin, OriginFetchError},
    store::CacheStore,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::time::Duration;
use tletypes::prelude::Provenance;
use tracing::{debug, warn};

pub const CACHE_KEY_PREFIX: &str = "tle:";

/// Reversible, hence collision-free, store key for a source URL
pub fn cache_key(url: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{}", STANDARD.encode(url))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fetched {
    pub text: String,
    pub provenance: Provenance,
}

#[derive(Debug)]
pub struct TleProxy<S, O> {
    store: S,
    origin: O,
    ttl: Duration,
}

impl<S: CacheStore, O: Origin> TleProxy<S, O> {
    pub fn new(store: S, origin: O, ttl: Duration) -> Self {
        TleProxy { store, origin, ttl }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn origin(&self) -> &O {
        &self.origin
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_tle_text(&self, url: &str) -> Result<Fetched, OriginFetchError> {
        let key = cache_key(url);

        if let Some(text) = self.store.get(&key).await {
            debug!(url, bytes = text.len(), "Cache hit");
            return Ok(Fetched {
                text,
                provenance: Provenance::Cache,
            });
        }

        debug!(url, "Cache miss");
        let text = match self.origin.fetch(url).await {
            Ok(text) => text,
            Err(e) => {
                // No negative caching, any existing entry is left alone
                warn!(url, error = %e, "Origin fetch failed");
                return Err(e);
            }
        };

        self.store.set(&key, text.clone(), self.ttl).await;
        Ok(Fetched {
            text,
            provenance: Provenance::Origin,
        })
    }
}
