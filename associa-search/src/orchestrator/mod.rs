//! Search orchestrator: cache-or-fetch, associative word scoring, blocking.
//!
//! [`SearchOrchestrator`] is built once at startup and shared as an
//! `Arc`. It owns the provider registry, the token scorer, the cache store
//! handle and the per-keyword coordination state (single-flight locks,
//! block lists and change notification).

pub mod notifier;
pub mod single_flight;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::cache::CacheStore;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::registry::ProviderRegistry;
use crate::scorer::{canonical_word, TokenCounts, TokenScorer};
use crate::types::{SearchResult, SearchResultCache};

use self::notifier::{ResultNotifier, ResultUpdate};
use self::single_flight::KeyedLocks;

/// Coordinates providers, cache and scoring for keyword searches.
pub struct SearchOrchestrator {
    config: SearchConfig,
    providers: ProviderRegistry,
    cache: Arc<dyn CacheStore>,
    scorer: TokenScorer,
    in_flight: KeyedLocks,
    blocked: DashMap<String, HashSet<String>>,
    notifier: ResultNotifier,
}

impl SearchOrchestrator {
    /// Build an orchestrator over a fully registered provider set.
    pub fn new(
        config: SearchConfig,
        providers: ProviderRegistry,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        let scorer = TokenScorer::new().with_extra_stop_words(&config.extra_stop_words);
        Self {
            config,
            providers,
            cache,
            scorer,
            in_flight: KeyedLocks::new(),
            blocked: DashMap::new(),
            notifier: ResultNotifier::new(),
        }
    }

    /// The configuration this orchestrator was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The registered providers.
    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Return the result for `keyword`, fetching and scoring it on a miss.
    ///
    /// # Pipeline
    ///
    /// 1. Cache hit → returned unchanged, no provider call
    /// 2. Take the keyword's single-flight lock and re-check the cache
    /// 3. Select the most recently registered available provider
    /// 4. Search, score every non-empty snippet into one shared counter
    /// 5. Keep the top K words that are not blocked for this keyword
    /// 6. Persist, notify subscribers, return
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidKeyword`] for an empty keyword
    /// - [`SearchError::ProviderUnavailable`] if no provider is available
    /// - the provider's error if its search fails
    ///
    /// Failures are never cached. Cache store failures are logged and
    /// treated as a miss (read) or skipped (write).
    pub async fn get_result(&self, keyword: &str) -> Result<SearchResultCache, SearchError> {
        let keyword = normalize_keyword(keyword)?;

        if let Some(cached) = self.read_cache(keyword).await {
            tracing::debug!(keyword, "cache hit");
            return Ok(cached);
        }

        let _flight = self.in_flight.lock(keyword).await;

        // Another caller may have filled the cache while we waited.
        if let Some(cached) = self.read_cache(keyword).await {
            tracing::debug!(keyword, "cache filled by concurrent request");
            return Ok(cached);
        }

        let provider = self
            .providers
            .select_available()
            .ok_or(SearchError::ProviderUnavailable)?;

        let start = Instant::now();
        let results = match provider.search(keyword).await {
            Ok(results) => results,
            Err(err) => {
                tracing::warn!(provider = %provider.kind(), error = %err, "provider search failed");
                return Err(err);
            }
        };
        tracing::info!(
            provider = %provider.kind(),
            count = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search complete"
        );

        let associative_words = self.rank(keyword, &results);
        let entry = SearchResultCache {
            results,
            associative_words,
        };

        if let Err(err) = self.cache.set(keyword, entry.clone()).await {
            tracing::warn!(error = %err, "failed to store search result");
        }
        self.notifier.publish(keyword, Some(Arc::new(entry.clone())));

        Ok(entry)
    }

    /// Read the cached result for `keyword` without fetching.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidKeyword`] or the cache store's error.
    pub async fn cached(&self, keyword: &str) -> Result<Option<SearchResultCache>, SearchError> {
        let keyword = normalize_keyword(keyword)?;
        self.cache.get(keyword).await
    }

    /// Delete the cached result for `keyword`. Absent keys are not an error.
    ///
    /// Waits for an in-flight fetch of the same keyword, so the fetch cannot
    /// re-insert the entry afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidKeyword`] or the cache store's error.
    pub async fn remove_result(&self, keyword: &str) -> Result<(), SearchError> {
        let keyword = normalize_keyword(keyword)?;
        let _flight = self.in_flight.lock(keyword).await;

        self.cache.remove(keyword).await?;
        self.notifier.publish(keyword, None);
        tracing::debug!(keyword, "cached result removed");
        Ok(())
    }

    /// Exclude `block_keyword` from the associative words of `search_keyword`.
    ///
    /// The word is added to the keyword's block list, so every later
    /// recompute skips it, and removed from the cached entry if there is one.
    /// Open subscriptions receive the edited entry. Serialised with fetches of
    /// the same keyword.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidKeyword`] if either argument is empty
    /// after normalisation, or the cache store's error.
    pub async fn block_associative_keyword(
        &self,
        search_keyword: &str,
        block_keyword: &str,
    ) -> Result<(), SearchError> {
        let keyword = normalize_keyword(search_keyword)?;
        let word = canonical_word(block_keyword);
        if word.is_empty() {
            return Err(SearchError::InvalidKeyword);
        }

        let _flight = self.in_flight.lock(keyword).await;

        self.blocked
            .entry(keyword.to_owned())
            .or_default()
            .insert(word.clone());

        if let Some(mut cached) = self.cache.get(keyword).await? {
            let before = cached.associative_words.len();
            cached.associative_words.retain(|w| *w != word);
            if cached.associative_words.len() != before {
                self.cache.set(keyword, cached.clone()).await?;
                self.notifier.publish(keyword, Some(Arc::new(cached)));
            }
        }

        tracing::debug!(keyword, blocked = %word, "associative keyword blocked");
        Ok(())
    }

    /// Words blocked for `keyword`, sorted.
    pub fn blocked_words(&self, keyword: &str) -> Vec<String> {
        let mut words: Vec<String> = self
            .blocked
            .get(keyword.trim())
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        words.sort();
        words
    }

    /// Receive change notifications for `keyword`.
    pub fn subscribe(&self, keyword: &str) -> watch::Receiver<ResultUpdate> {
        self.notifier.subscribe(keyword.trim())
    }

    /// Release notification state for `keyword` once no receiver is left.
    pub fn unsubscribe(&self, keyword: &str) {
        self.notifier.prune(keyword.trim());
    }

    /// Score all snippets and rank the top words for `keyword`.
    fn rank(&self, keyword: &str, results: &[SearchResult]) -> Vec<String> {
        let counts = TokenCounts::new();
        for snippet in results
            .iter()
            .filter_map(|r| r.snippet.as_deref())
            .filter(|s| !s.is_empty())
        {
            let outcome = self.scorer.score(snippet, &counts);
            if outcome.is_overflowed() {
                tracing::debug!(
                    counted = outcome.counted(),
                    "token counter overflow, rest of snippet skipped"
                );
            }
        }

        let k = self.config.max_associative_words;
        match self.blocked.get(keyword) {
            Some(blocked) => counts.top_k(k, &blocked),
            None => counts.top_k(k, &HashSet::new()),
        }
    }

    async fn read_cache(&self, keyword: &str) -> Option<SearchResultCache> {
        match self.cache.get(keyword).await {
            Ok(hit) => hit,
            Err(err) => {
                tracing::warn!(error = %err, "cache read failed, treating as miss");
                None
            }
        }
    }
}

impl std::fmt::Debug for SearchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOrchestrator")
            .field("config", &self.config)
            .field("providers", &self.providers)
            .field("in_flight", &self.in_flight.len())
            .field("watched", &self.notifier.len())
            .finish()
    }
}

/// Trim `keyword`, rejecting it if nothing is left.
fn normalize_keyword(keyword: &str) -> Result<&str, SearchError> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Err(SearchError::InvalidKeyword);
    }
    Ok(trimmed)
}
