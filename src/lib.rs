//! associa: keyword search with associative keywords and live subscriptions.
//!
//! This crate wires the [`associa_search`] core into a service:
//! HTTP request → subscription registry → orchestrator → provider / cache → SSE
//!
//! # Architecture
//!
//! - **Config**: TOML file plus `ASSOCIA_*` environment overrides
//! - **Orchestrator**: built once at startup, shared through the axum state
//! - **Server**: axum routes; each subscription is an SSE stream fed by its
//!   own delivery task

pub mod config;
pub mod error;
pub mod server;

use std::sync::Arc;

use associa_search::{MemoryCacheStore, ProviderRegistry, SearchOrchestrator, providers};

pub use config::{AppConfig, ServerConfig};
pub use error::{AppError, Result};
pub use server::SearchServer;

/// Build the orchestrator described by `config` with the built-in providers
/// and an in-memory cache.
///
/// Providers that fail to initialise (usually missing credentials) are
/// logged and left out; the orchestrator then reports
/// `ProviderUnavailable` until one is registered.
pub fn build_orchestrator(config: &AppConfig) -> SearchOrchestrator {
    let mut registry = ProviderRegistry::new(config.providers.clone());
    let registered = providers::register_builtin(&mut registry);
    if registered == 0 {
        tracing::warn!("no search provider registered; lookups will fail");
    }

    let cache = Arc::new(MemoryCacheStore::from_config(&config.search));
    SearchOrchestrator::new(config.search.clone(), registry, cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use associa_search::ProviderKind;

    #[test]
    fn orchestrator_without_credentials_has_no_provider() {
        let orchestrator = build_orchestrator(&AppConfig::default());
        assert!(orchestrator.providers().is_empty());
    }

    #[test]
    fn orchestrator_with_credentials_registers_google() {
        let mut config = AppConfig::default();
        config.providers.google.api_key = Some("key".into());
        config.providers.google.search_engine_id = Some("cx".into());
        config.search.max_associative_words = 4;

        let orchestrator = build_orchestrator(&config);
        assert_eq!(orchestrator.providers().kinds(), vec![ProviderKind::GoogleCustomJson]);
        assert_eq!(orchestrator.config().max_associative_words, 4);
    }
}
