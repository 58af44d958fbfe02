//! Ordered registry of search providers.
//!
//! Providers are appended during startup. Selection walks the list from the
//! most recently registered provider backwards and takes the first one that
//! is available, so a later registration acts as a preferred override and
//! earlier ones as its fallback chain.

use std::sync::Arc;

use crate::config::ProviderSettings;
use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::types::ProviderKind;

/// Registered providers in registration order.
///
/// Registration needs `&mut self`; once the registry is handed to the
/// orchestrator it is only read, so lookups take no lock.
pub struct ProviderRegistry {
    settings: ProviderSettings,
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry that initialises providers with `settings`.
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            providers: Vec::new(),
        }
    }

    /// Initialise and append a provider.
    ///
    /// # Errors
    ///
    /// - [`SearchError::AlreadyRegistered`] if a provider of the same kind is
    ///   already present.
    /// - [`SearchError::ProviderInit`] (or whatever the provider reports) if
    ///   its initialisation fails. The provider is not added.
    pub fn register(&mut self, provider: Arc<dyn SearchProvider>) -> Result<(), SearchError> {
        let kind = provider.kind();
        if self.providers.iter().any(|p| p.kind() == kind) {
            return Err(SearchError::AlreadyRegistered(kind));
        }

        provider.initialize(&self.settings)?;

        tracing::info!(provider = %kind, "search provider registered");
        self.providers.push(provider);
        Ok(())
    }

    /// The most recently registered provider that is currently available.
    pub fn select_available(&self) -> Option<Arc<dyn SearchProvider>> {
        self.providers
            .iter()
            .rev()
            .find(|p| p.is_available())
            .cloned()
    }

    /// Look up a registered provider by kind.
    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn SearchProvider>> {
        self.providers.iter().find(|p| p.kind() == kind).cloned()
    }

    /// Kinds of all providers, in registration order.
    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Kinds and availability of all providers, in registration order.
    pub fn status(&self) -> Vec<(ProviderKind, bool)> {
        self.providers
            .iter()
            .map(|p| (p.kind(), p.is_available()))
            .collect()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::provider::Availability;
    use crate::types::SearchResult;
    use async_trait::async_trait;

    struct StubProvider {
        kind: ProviderKind,
        available: Availability,
        init_ok: bool,
    }

    impl StubProvider {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                kind: ProviderKind::Custom(name),
                available: Availability::default(),
                init_ok: true,
            })
        }

        fn failing_init(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                kind: ProviderKind::Custom(name),
                available: Availability::default(),
                init_ok: false,
            })
        }
    }

    #[async_trait]
    impl SearchProvider for StubProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn is_available(&self) -> bool {
            self.available.get()
        }

        fn set_available(&self, available: bool) {
            self.available.set(available);
        }

        fn initialize(&self, _settings: &ProviderSettings) -> Result<(), SearchError> {
            if self.init_ok {
                Ok(())
            } else {
                Err(SearchError::ProviderInit("stub refused settings".into()))
            }
        }

        async fn search(&self, _keyword: &str) -> Result<Vec<SearchResult>, SearchError> {
            Ok(vec![])
        }
    }

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new(ProviderSettings::default())
    }

    #[test]
    fn empty_registry_selects_nothing() {
        let registry = registry();
        assert!(registry.is_empty());
        assert!(registry.select_available().is_none());
    }

    #[test]
    fn latest_available_provider_wins() {
        let mut registry = registry();
        let a = StubProvider::new("a");
        let b = StubProvider::new("b");
        registry.register(a.clone()).expect("register a");
        registry.register(b.clone()).expect("register b");

        let selected = registry.select_available().expect("one is available");
        assert_eq!(selected.kind(), ProviderKind::Custom("b"));

        b.set_available(false);
        let selected = registry.select_available().expect("a is available");
        assert_eq!(selected.kind(), ProviderKind::Custom("a"));

        a.set_available(false);
        assert!(registry.select_available().is_none());

        b.set_available(true);
        let selected = registry.select_available().expect("b is back");
        assert_eq!(selected.kind(), ProviderKind::Custom("b"));
    }

    #[test]
    fn duplicate_kind_rejected() {
        let mut registry = registry();
        registry.register(StubProvider::new("a")).expect("first");
        let err = registry.register(StubProvider::new("a")).unwrap_err();
        assert!(matches!(err, SearchError::AlreadyRegistered(ProviderKind::Custom("a"))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_initialisation_excludes_provider() {
        let mut registry = registry();
        let err = registry.register(StubProvider::failing_init("bad")).unwrap_err();
        assert!(matches!(err, SearchError::ProviderInit(_)));
        assert!(registry.is_empty());
        assert!(registry.get(ProviderKind::Custom("bad")).is_none());
    }

    #[test]
    fn selection_is_deterministic() {
        let mut registry = registry();
        registry.register(StubProvider::new("a")).expect("a");
        registry.register(StubProvider::new("b")).expect("b");
        registry.register(StubProvider::new("c")).expect("c");

        for _ in 0..10 {
            let selected = registry.select_available().expect("available");
            assert_eq!(selected.kind(), ProviderKind::Custom("c"));
        }
    }

    #[test]
    fn status_lists_in_registration_order() {
        let mut registry = registry();
        let a = StubProvider::new("a");
        registry.register(a.clone()).expect("a");
        registry.register(StubProvider::new("b")).expect("b");
        a.set_available(false);

        assert_eq!(
            registry.kinds(),
            vec![ProviderKind::Custom("a"), ProviderKind::Custom("b")]
        );
        assert_eq!(
            registry.status(),
            vec![
                (ProviderKind::Custom("a"), false),
                (ProviderKind::Custom("b"), true)
            ]
        );
    }

    #[test]
    fn get_finds_registered_provider() {
        let mut registry = registry();
        registry.register(StubProvider::new("a")).expect("a");
        let found = registry.get(ProviderKind::Custom("a")).expect("present");
        found.set_available(false);
        assert!(registry.select_available().is_none());
    }
}
