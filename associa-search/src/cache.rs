//! Result cache store.
//!
//! [`CacheStore`] is the contract the orchestrator relies on: a single
//! namespace of [`SearchResultCache`] values keyed by keyword. Stores may be
//! shared with other processes and are only assumed to be eventually
//! consistent.
//!
//! [`MemoryCacheStore`] is the in-process implementation, backed by
//! [`moka`] with a TTL and a capacity bound.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::SearchResultCache;

/// Keyword-keyed storage for computed results.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up the cached result for `key`. `Ok(None)` on a miss.
    async fn get(&self, key: &str) -> Result<Option<SearchResultCache>, SearchError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: SearchResultCache) -> Result<(), SearchError>;

    /// Delete `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), SearchError>;
}

/// In-memory [`CacheStore`] with TTL and LRU-style eviction.
#[derive(Clone)]
pub struct MemoryCacheStore {
    cache: Cache<String, SearchResultCache>,
}

impl MemoryCacheStore {
    /// Create a store holding at most `max_entries` keywords.
    ///
    /// A `ttl_seconds` of 0 keeps entries until they are removed or evicted.
    pub fn new(max_entries: u64, ttl_seconds: u64) -> Self {
        let mut builder = Cache::builder().max_capacity(max_entries);
        if ttl_seconds > 0 {
            builder = builder.time_to_live(Duration::from_secs(ttl_seconds));
        }
        Self {
            cache: builder.build(),
        }
    }

    /// Create a store sized from the search configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.cache_max_entries, config.cache_ttl_seconds)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<SearchResultCache>, SearchError> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: SearchResultCache) -> Result<(), SearchError> {
        self.cache.insert(key.to_owned(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SearchError> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}

impl std::fmt::Debug for MemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheStore")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
