//! Key-value stores with per-key expiry, used by the cache-aside proxy.

use std::{collections::HashMap, future::Future, time::Duration};
use tokio::{sync::RwLock, time::Instant};

pub trait CacheStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, unless it has expired
    fn get(&self, key: &str) -> impl Future<Output = Option<String>> + Send;

    /// Stores `value` under `key`, replacing any previous value and expiry
    fn set(&self, key: &str, value: String, ttl: Duration) -> impl Future<Output = ()> + Send;
}

/// An in-process store.
///
/// Expiry is measured on tokio's clock, so paused-time tests can step
/// across a TTL boundary.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

#[derive(Debug)]
struct Entry {
    text: String,
    expires_at: Instant,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, expired ones included until the next write
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        (Instant::now() < entry.expires_at).then(|| entry.text.clone())
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_owned(),
            Entry {
                text: value,
                expires_at: now + ttl,
            },
        );
    }
}
