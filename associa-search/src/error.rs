//! Error types for the associa-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys appear in error messages.

use crate::types::ProviderKind;

/// Errors that can occur while searching, caching or subscribing.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A live subscription already exists for this connection and keyword.
    #[error("duplicate subscription: {connection_id}:{keyword}")]
    DuplicateSubscription {
        /// Connection that tried to subscribe again.
        connection_id: String,
        /// Keyword of the rejected subscription.
        keyword: String,
    },

    /// No registered provider is currently available.
    #[error("no search provider available")]
    ProviderUnavailable,

    /// A provider of the same kind is already registered.
    #[error("provider already registered: {0}")]
    AlreadyRegistered(ProviderKind),

    /// A provider rejected its settings during initialisation.
    #[error("provider init failed: {0}")]
    ProviderInit(String),

    /// An HTTP request to a provider failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The cache store failed.
    #[error("cache error: {0}")]
    Cache(String),

    /// The keyword is empty after trimming.
    #[error("invalid keyword: must not be empty")]
    InvalidKeyword,

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for associa-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
