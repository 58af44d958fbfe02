//! Search and provider configuration with sensible defaults.
//!
//! [`SearchConfig`] controls scoring, caching and subscription delivery.
//! [`ProviderSettings`] is handed to every provider's `initialize` and carries
//! the credentials for the external search APIs.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Default Custom Search JSON API endpoint.
pub const GOOGLE_DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Configuration for the orchestrator and subscription delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of associative words kept per keyword.
    pub max_associative_words: usize,
    /// How long cached results live in seconds. 0 keeps them until removed.
    pub cache_ttl_seconds: u64,
    /// Maximum number of keywords held by the in-memory cache.
    pub cache_max_entries: u64,
    /// Fallback interval at which subscriptions re-read the cache store.
    pub poll_interval_ms: u64,
    /// Additional stop words on top of the built-in English list.
    pub extra_stop_words: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_associative_words: 10,
            cache_ttl_seconds: 600,
            cache_max_entries: 1000,
            poll_interval_ms: 1000,
            extra_stop_words: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_associative_words` must be greater than 0
    /// - `poll_interval_ms` must be greater than 0
    /// - `cache_max_entries` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_associative_words == 0 {
            return Err(SearchError::Config(
                "max_associative_words must be greater than 0".into(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(SearchError::Config(
                "poll_interval_ms must be greater than 0".into(),
            ));
        }
        if self.cache_max_entries == 0 {
            return Err(SearchError::Config(
                "cache_max_entries must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Settings passed to providers when they are registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Google Custom Search settings.
    pub google: GoogleSettings,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 8,
            google: GoogleSettings::default(),
        }
    }
}

impl ProviderSettings {
    /// Validates the provider settings.
    ///
    /// Missing credentials are not an error here: the affected provider
    /// simply fails its own initialisation and is left out of the registry.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if !(1..=10).contains(&self.google.num_results) {
            return Err(SearchError::Config(
                "google.num_results must be between 1 and 10".into(),
            ));
        }
        Ok(())
    }
}

/// Credentials and options for the Custom Search JSON API.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// API key. `None` disables the provider.
    pub api_key: Option<String>,
    /// Programmable search engine id (`cx`). `None` disables the provider.
    pub search_engine_id: Option<String>,
    /// API endpoint, overridable for testing.
    pub endpoint: String,
    /// Results requested per search (the API caps this at 10).
    pub num_results: u8,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            search_engine_id: None,
            endpoint: GOOGLE_DEFAULT_ENDPOINT.to_owned(),
            num_results: 10,
        }
    }
}

// Keep the API key out of logs.
impl std::fmt::Debug for GoogleSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("search_engine_id", &self.search_engine_id)
            .field("endpoint", &self.endpoint)
            .field("num_results", &self.num_results)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.max_associative_words, 10);
        assert_eq!(config.cache_ttl_seconds, 600);
        assert_eq!(config.cache_max_entries, 1000);
        assert_eq!(config.poll_interval_ms, 1000);
        assert!(config.extra_stop_words.is_empty());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_max_associative_words_rejected() {
        let config = SearchConfig {
            max_associative_words: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_associative_words"));
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let config = SearchConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn zero_ttl_is_valid() {
        let config = SearchConfig {
            cache_ttl_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_provider_settings_have_no_credentials() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.timeout_seconds, 8);
        assert!(settings.google.api_key.is_none());
        assert!(settings.google.search_engine_id.is_none());
        assert_eq!(settings.google.endpoint, GOOGLE_DEFAULT_ENDPOINT);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let settings = ProviderSettings {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn num_results_out_of_range_rejected() {
        let mut settings = ProviderSettings::default();
        settings.google.num_results = 11;
        assert!(settings.validate().is_err());
        settings.google.num_results = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let google = GoogleSettings {
            api_key: Some("secret-key".into()),
            ..Default::default()
        };
        let debug = format!("{google:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
