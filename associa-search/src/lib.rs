//! # associa-search
//!
//! Cache-backed keyword search with associative keyword scoring and
//! per-client result subscriptions.
//!
//! A keyword lookup is served from the cache when possible. On a miss the
//! most recently registered available provider is queried, every result
//! snippet is tokenised and counted, and the top-ranked tokens become the
//! keyword's associative words. Clients subscribe per keyword and receive the
//! current result plus every later change.
//!
//! ## Design
//!
//! - [`SearchOrchestrator`] owns the cache-or-fetch flow with single-flight
//!   per keyword, so concurrent misses reach the provider once
//! - [`TokenScorer`] normalises snippet tokens and drops stop words and
//!   numbers; ranking breaks ties alphabetically
//! - [`ConnectionRegistry`] allows one live subscription per
//!   (connection, keyword) pair; [`SubscriptionDelivery`] feeds it
//! - The cache store and the providers sit behind traits
//!   ([`CacheStore`], [`SearchProvider`])
//!
//! ## Security
//!
//! - API keys never appear in errors or `Debug` output
//! - Search keywords are logged at debug level only
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> associa_search::Result<()> {
//! use std::sync::Arc;
//! use associa_search::{
//!     providers, MemoryCacheStore, ProviderRegistry, ProviderSettings, SearchConfig,
//!     SearchOrchestrator,
//! };
//!
//! let config = SearchConfig::default();
//! let mut registry = ProviderRegistry::new(ProviderSettings::default());
//! providers::register_builtin(&mut registry);
//!
//! let cache = Arc::new(MemoryCacheStore::from_config(&config));
//! let orchestrator = SearchOrchestrator::new(config, registry, cache);
//! let result = orchestrator.get_result("rust programming").await?;
//! println!("{:?}", result.associative_words);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod connection;
pub mod delivery;
pub mod error;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod scorer;
pub mod stop_words;
pub mod types;

pub use cache::{CacheStore, MemoryCacheStore};
pub use config::{GoogleSettings, ProviderSettings, SearchConfig};
pub use connection::{ConnectionRegistry, Subscription, SubscriptionGuard, SubscriptionKey};
pub use delivery::{Delivery, DeliverySink, SubscriptionDelivery};
pub use error::{Result, SearchError};
pub use orchestrator::SearchOrchestrator;
pub use provider::{Availability, SearchProvider};
pub use providers::GoogleCustomSearchProvider;
pub use registry::ProviderRegistry;
pub use scorer::{ScoreOutcome, TokenCounts, TokenScorer};
pub use types::{ProviderKind, SearchResult, SearchResultCache};
