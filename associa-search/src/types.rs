//! Core types for search results, cached result sets and provider identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single search result returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result page.
    pub link: String,
    /// A text snippet summarising the page, when the provider supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// The cached outcome of a keyword search.
///
/// `associative_words` is ordered by descending score and never longer than
/// the configured maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultCache {
    /// Raw provider results, in provider order.
    pub results: Vec<SearchResult>,
    /// Terms derived from the result snippets, highest score first.
    pub associative_words: Vec<String>,
}

/// Identity of a search provider.
///
/// Two providers with the same kind cannot be registered together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProviderKind {
    /// Google Custom Search JSON API v1.
    GoogleCustomJson,
    /// A provider supplied by the embedding application.
    Custom(&'static str),
}

impl ProviderKind {
    /// Returns the human-readable name of this provider kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoogleCustomJson => "GoogleCustomJson",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
