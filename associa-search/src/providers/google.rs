//! Google Custom Search JSON API provider.
//!
//! Issues `GET {endpoint}?key=..&cx=..&q=..&num=..` and maps each entry of
//! the response's `items` array to a [`SearchResult`]. Needs an API key and a
//! programmable search engine id; without either, initialisation fails and
//! the provider stays out of the registry.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::config::ProviderSettings;
use crate::error::SearchError;
use crate::provider::{Availability, SearchProvider};
use crate::types::{ProviderKind, SearchResult};

/// Custom Search JSON API client.
#[derive(Default)]
pub struct GoogleCustomSearchProvider {
    state: OnceLock<GoogleClient>,
    available: Availability,
}

struct GoogleClient {
    client: reqwest::Client,
    api_key: String,
    search_engine_id: String,
    endpoint: Url,
    num_results: u8,
}

impl GoogleCustomSearchProvider {
    /// Create an uninitialised provider.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SearchProvider for GoogleCustomSearchProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleCustomJson
    }

    fn is_available(&self) -> bool {
        self.available.get()
    }

    fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    fn initialize(&self, settings: &ProviderSettings) -> Result<(), SearchError> {
        let google = &settings.google;
        let api_key = non_empty(google.api_key.as_deref())
            .ok_or_else(|| SearchError::ProviderInit("google api_key is not set".into()))?;
        let search_engine_id = non_empty(google.search_engine_id.as_deref()).ok_or_else(|| {
            SearchError::ProviderInit("google search_engine_id is not set".into())
        })?;
        let endpoint = Url::parse(&google.endpoint).map_err(|e| {
            SearchError::ProviderInit(format!("invalid google endpoint {:?}: {e}", google.endpoint))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))?;

        self.state
            .set(GoogleClient {
                client,
                api_key: api_key.to_owned(),
                search_engine_id: search_engine_id.to_owned(),
                endpoint,
                num_results: google.num_results,
            })
            .map_err(|_| SearchError::ProviderInit("google provider already initialised".into()))
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, SearchError> {
        let state = self.state.get().ok_or_else(|| {
            SearchError::ProviderInit("google provider used before initialisation".into())
        })?;

        let mut url = state.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", &state.api_key)
            .append_pair("cx", &state.search_engine_id)
            .append_pair("q", keyword)
            .append_pair("num", &state.num_results.to_string());

        tracing::debug!(keyword, "Google Custom Search request");

        // The URL carries the API key: strip it from every error.
        let response = state
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("Google request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http(format!("Google returned HTTP {status}")));
        }

        let body = response.text().await.map_err(|e| {
            SearchError::Http(format!("Google response read failed: {}", e.without_url()))
        })?;

        parse_google_response(&body)
    }
}

impl std::fmt::Debug for GoogleCustomSearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCustomSearchProvider")
            .field("initialized", &self.state.get().is_some())
            .field("available", &self.available.get())
            .finish()
    }
}

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    snippet: Option<String>,
}

/// Parse a Custom Search JSON response body.
///
/// A response without `items` (no hits) yields an empty list.
pub(crate) fn parse_google_response(body: &str) -> Result<Vec<SearchResult>, SearchError> {
    let response: GoogleResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("invalid Google response: {e}")))?;

    Ok(response
        .items
        .into_iter()
        .filter(|item| !item.link.is_empty())
        .map(|item| SearchResult {
            title: item.title,
            link: item.link,
            snippet: item.snippet.filter(|s| !s.is_empty()),
        })
        .collect())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
