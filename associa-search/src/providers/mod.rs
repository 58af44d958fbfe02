//! Built-in search provider implementations.

pub mod google;

use std::sync::Arc;

pub use google::GoogleCustomSearchProvider;

use crate::registry::ProviderRegistry;

/// Register every built-in provider that initialises with the registry's
/// settings. Failures are logged and skipped.
///
/// Returns the number of providers registered.
pub fn register_builtin(registry: &mut ProviderRegistry) -> usize {
    let builtin: Vec<Arc<dyn crate::provider::SearchProvider>> =
        vec![Arc::new(GoogleCustomSearchProvider::new())];

    let mut registered = 0;
    for provider in builtin {
        let kind = provider.kind();
        match registry.register(provider) {
            Ok(()) => registered += 1,
            Err(e) => tracing::warn!(provider = %kind, error = %e, "search provider not registered"),
        }
    }
    registered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;
    use crate::types::ProviderKind;

    #[test]
    fn builtin_skipped_without_credentials() {
        let mut registry = ProviderRegistry::new(ProviderSettings::default());
        assert_eq!(register_builtin(&mut registry), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn builtin_registered_with_credentials() {
        let mut settings = ProviderSettings::default();
        settings.google.api_key = Some("key".into());
        settings.google.search_engine_id = Some("cx".into());

        let mut registry = ProviderRegistry::new(settings);
        assert_eq!(register_builtin(&mut registry), 1);
        assert!(registry.get(ProviderKind::GoogleCustomJson).is_some());
    }
}
