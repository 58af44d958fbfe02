//! Google Custom Search provider contract tests.
//!
//! Verify the request format sent to the Custom Search JSON API and the
//! handling of its responses against a local mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use associa_search::{
    GoogleCustomSearchProvider, ProviderSettings, SearchError, SearchProvider,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> ProviderSettings {
    let mut settings = ProviderSettings::default();
    settings.google.api_key = Some("test-google-key".into());
    settings.google.search_engine_id = Some("test-cx".into());
    settings.google.endpoint = format!("{}/customsearch/v1", server.uri());
    settings.google.num_results = 5;
    settings
}

fn provider_for(server: &MockServer) -> GoogleCustomSearchProvider {
    let provider = GoogleCustomSearchProvider::new();
    provider.initialize(&settings_for(server)).unwrap();
    provider
}

#[tokio::test]
async fn request_carries_credentials_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "test-google-key"))
        .and(query_param("cx", "test-cx"))
        .and(query_param("q", "rust borrow checker"))
        .and(query_param("num", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let results = provider_for(&server)
        .search("rust borrow checker")
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn items_are_mapped_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "customsearch#search",
            "items": [
                {
                    "title": "The Rust Programming Language",
                    "link": "https://doc.rust-lang.org/book/",
                    "snippet": "Affectionately nicknamed \"the book\""
                },
                {
                    "title": "Rust (programming language) - Wikipedia",
                    "link": "https://en.wikipedia.org/wiki/Rust_(programming_language)"
                }
            ]
        })))
        .mount(&server)
        .await;

    let results = provider_for(&server).search("rust").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "The Rust Programming Language");
    assert_eq!(results[0].link, "https://doc.rust-lang.org/book/");
    assert!(results[0].snippet.as_deref().unwrap().contains("the book"));
    assert!(results[1].snippet.is_none());
}

#[tokio::test]
async fn no_items_is_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "customsearch#search",
            "searchInformation": {"totalResults": "0"}
        })))
        .mount(&server)
        .await;

    let results = provider_for(&server).search("zzzzqqq").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn error_status_is_http_error_without_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "quota exceeded"}
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server).search("rust").await.unwrap_err();
    assert!(matches!(err, SearchError::Http(_)));
    assert!(err.to_string().contains("403"));
    assert!(!err.to_string().contains("test-google-key"));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server).search("rust").await.unwrap_err();
    assert!(matches!(err, SearchError::Parse(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_http_error_without_key() {
    let server = MockServer::start().await;
    let settings = settings_for(&server);
    drop(server);

    let provider = GoogleCustomSearchProvider::new();
    provider.initialize(&settings).unwrap();
    let err = provider.search("rust").await.unwrap_err();
    assert!(matches!(err, SearchError::Http(_)));
    assert!(!err.to_string().contains("test-google-key"));
}
