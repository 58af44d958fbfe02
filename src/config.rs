//! Configuration types for the search service.

use associa_search::{ProviderSettings, SearchConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Environment variable overriding `providers.google.api_key`.
pub const ENV_GOOGLE_API_KEY: &str = "ASSOCIA_GOOGLE_API_KEY";

/// Environment variable overriding `providers.google.search_engine_id`.
pub const ENV_GOOGLE_CX: &str = "ASSOCIA_GOOGLE_CX";

/// Top-level configuration for the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Scoring, cache and subscription settings.
    pub search: SearchConfig,
    /// Search provider settings and credentials.
    pub providers: ProviderSettings,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to. `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/associa/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("associa").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("associa")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/associa-config/config.toml")
        }
    }

    /// Load from `path`, or from the default path if that file exists, or
    /// use defaults. Environment overrides are applied on top.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit or existing default file cannot be
    /// read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `ASSOCIA_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let google = &mut self.providers.google;
        if let Some(key) = lookup(ENV_GOOGLE_API_KEY).filter(|v| !v.trim().is_empty()) {
            google.api_key = Some(key);
        }
        if let Some(cx) = lookup(ENV_GOOGLE_CX).filter(|v| !v.trim().is_empty()) {
            google.search_engine_id = Some(cx);
        }
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(AppError::Config("server.host must not be empty".into()));
        }
        self.search.validate()?;
        self.providers.validate()?;
        Ok(())
    }
}
