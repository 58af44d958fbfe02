//! Trait definition for pluggable search providers.
//!
//! Each external search backend implements [`SearchProvider`]. Providers are
//! registered once at startup in a [`ProviderRegistry`](crate::ProviderRegistry);
//! their availability flag can be flipped at runtime by health signals and is
//! re-read on every provider selection.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::config::ProviderSettings;
use crate::error::SearchError;
use crate::types::{ProviderKind, SearchResult};

/// A pluggable search backend.
///
/// All implementations must be `Send + Sync`: the registry hands out shared
/// references to concurrent searches.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Which provider this is. Used as its registry identity.
    fn kind(&self) -> ProviderKind;

    /// Whether the provider may currently be selected.
    fn is_available(&self) -> bool;

    /// Flip the availability flag.
    fn set_available(&self, available: bool);

    /// Prepare the provider with its settings.
    ///
    /// Called exactly once, during registration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ProviderInit`] if the settings are unusable
    /// (missing credentials, invalid endpoint). The provider is then left out
    /// of the registry.
    fn initialize(&self, settings: &ProviderSettings) -> Result<(), SearchError>;

    /// Search for `keyword` and return the provider's results in its own order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails or the response cannot
    /// be parsed.
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, SearchError>;
}

/// Lock-free availability flag for provider implementations.
#[derive(Debug)]
pub struct Availability(AtomicBool);

impl Availability {
    /// Create a flag with the given initial state.
    pub fn new(available: bool) -> Self {
        Self(AtomicBool::new(available))
    }

    /// Read the flag.
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Write the flag.
    pub fn set(&self, available: bool) {
        self.0.store(available, Ordering::Release);
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self::new(true)
    }
}
