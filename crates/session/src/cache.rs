//! TTL-based response cache.
//!
//! Key is the lowercase-trimmed user input. Expiry is lazy: an entry older
//! than the TTL is treated as a miss on read and removed; there is no
//! background sweeper. When capacity is exceeded the oldest-inserted entry
//! is evicted. There is no write-side invalidation — staleness is bounded
//! only by the TTL. Fast-path replies and memory commands never touch this
//! cache.

use chrono::{DateTime, Duration, Utc};
use gigmate_core::AgentResponse;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    response: AgentResponse,
    inserted_at: DateTime<Utc>,
}

/// A bounded, TTL-expiring cache of recent input → response pairs.
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
    capacity: usize,
}

impl ResponseCache {
    pub fn new(ttl_secs: u64, capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs as i64),
            capacity,
        }
    }

    /// Normalize an input into its cache key.
    pub fn normalize(input: &str) -> String {
        input.trim().to_lowercase()
    }

    /// Look up a cached response. Expired entries are removed on read.
    pub async fn get(&self, input: &str) -> Option<AgentResponse> {
        let key = Self::normalize(input);
        let now = Utc::now();

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if now - entry.inserted_at < self.ttl => {
                    debug!(key = %key, "Response cache hit");
                    return Some(entry.response.clone());
                }
                Some(_) => {} // expired, fall through to remove
                None => return None,
            }
        }

        self.entries.write().await.remove(&key);
        None
    }

    /// Insert a response. Evicts the oldest-inserted entry when full.
    pub async fn put(&self, input: &str, response: AgentResponse) {
        let key = Self::normalize(input);
        let mut entries = self.entries.write().await;

        entries.insert(
            key,
            CacheEntry {
                response,
                inserted_at: Utc::now(),
            },
        );

        if entries.len() > self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!(key = %oldest, "Evicting oldest cache entry");
                entries.remove(&oldest);
            }
        }
    }

    /// Purge every entry. The cache is keyed by input text alone, so
    /// session-scoped clearing drops the whole cache.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries (including any not yet lazily expired).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    #[cfg(test)]
    async fn backdate(&self, input: &str, age_secs: i64) {
        let key = Self::normalize(input);
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(&key) {
            entry.inserted_at = Utc::now() - Duration::seconds(age_secs);
        }
    }
}
