//! HTTP surface for keyword search subscriptions.
//!
//! Exposes the search orchestrator over HTTP. A subscription is an SSE
//! stream that carries the current result for a keyword and every later
//! change to it.
//!
//! ## Endpoints
//!
//! - `GET /search/{keyword}`: subscribe (SSE, `result` and `error` events)
//! - `PUT /search/block`: block an associative word for a keyword
//! - `DELETE /search/{keyword}`: drop the cached result
//! - `DELETE /search/{keyword}/subscriptions`: end all subscriptions on a keyword
//! - `GET /health`: provider availability and open subscriptions
//!
//! A connection is identified by the `x-connection-id` request header when
//! present, otherwise by the peer socket address.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use associa_search::{
    ConnectionRegistry, Delivery, DeliverySink, SearchError, SearchOrchestrator,
    SubscriptionDelivery,
};
use axum::Router;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, put};
use futures_util::stream::Stream;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::{AppError, Result};

/// Request header carrying a client-chosen connection identifier.
pub const CONNECTION_ID_HEADER: &str = "x-connection-id";

/// Buffered deliveries per subscription before the loop waits on the client.
const SINK_CAPACITY: usize = 16;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `PUT /search/block`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    /// Keyword whose associative words are edited.
    pub search_keyword: String,
    /// Word to exclude.
    pub block_keyword: String,
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Response of `DELETE /search/{keyword}/subscriptions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    /// Number of subscriptions cancelled.
    pub cancelled: usize,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server answers.
    pub status: String,
    /// Registered providers in registration order.
    pub providers: Vec<ProviderStatus>,
    /// Open subscription slots.
    pub subscriptions: usize,
}

/// Availability of one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatus {
    /// Provider name.
    pub kind: String,
    /// Whether it can currently be selected.
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<SearchOrchestrator>,
    connections: Arc<ConnectionRegistry<DeliverySink>>,
}

impl AppState {
    /// Bundle the orchestrator with a subscription registry.
    pub fn new(
        orchestrator: Arc<SearchOrchestrator>,
        connections: Arc<ConnectionRegistry<DeliverySink>>,
    ) -> Self {
        Self {
            orchestrator,
            connections,
        }
    }
}

/// Build the router over `state`.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()`; the
/// subscribe handler needs the peer address.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/search/block", put(handle_block))
        .route(
            "/search/{keyword}",
            get(handle_subscribe).delete(handle_remove),
        )
        .route(
            "/search/{keyword}/subscriptions",
            axum::routing::delete(handle_cancel_subscriptions),
        )
        .with_state(state)
}

// ---------------------------------------------------------------------------
// SearchServer
// ---------------------------------------------------------------------------

/// HTTP server over a shared [`SearchOrchestrator`].
pub struct SearchServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    connections: Arc<ConnectionRegistry<DeliverySink>>,
    shutdown: CancellationToken,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl SearchServer {
    /// Start the HTTP server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for auto-assign)
    /// and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(
        orchestrator: Arc<SearchOrchestrator>,
        config: &ServerConfig,
    ) -> Result<Self> {
        let connections = Arc::new(ConnectionRegistry::new());
        let app = router(AppState::new(orchestrator, Arc::clone(&connections)));

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| AppError::Server(format!("bind to {bind_addr} failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Server(format!("failed to get local addr: {e}")))?;

        info!("search server listening on http://{addr}");

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        let handle = tokio::spawn(async move {
            let service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, service)
                .with_graceful_shutdown(signal.cancelled_owned())
                .await
            {
                tracing::error!("search server error: {e}");
            }
        });

        Ok(Self {
            addr,
            connections,
            shutdown,
            handle,
        })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Subscriptions served by this server.
    pub fn connections(&self) -> &Arc<ConnectionRegistry<DeliverySink>> {
        &self.connections
    }

    /// Cancel every subscription, stop accepting connections and wait for
    /// open streams to finish.
    pub async fn shutdown(mut self) {
        let cancelled = self.connections.cancel_all();
        info!(cancelled, "search server shutting down");
        self.shutdown.cancel();
        if let Err(e) = (&mut self.handle).await {
            tracing::warn!("search server task ended abnormally: {e}");
        }
    }
}

impl Drop for SearchServer {
    fn drop(&mut self) {
        self.connections.cancel_all();
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a core error onto an HTTP status.
fn status_for(err: &SearchError) -> StatusCode {
    match err {
        SearchError::DuplicateSubscription { .. } => StatusCode::BAD_GATEWAY,
        SearchError::InvalidKeyword => StatusCode::BAD_REQUEST,
        SearchError::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        SearchError::Http(_) | SearchError::Parse(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &SearchError) -> Response {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    (status_for(err), Json(body)).into_response()
}

/// Connection identity: the header if set, else the peer address.
fn connection_id(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get(CONNECTION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| peer.to_string())
}

/// Render one delivery as an SSE event.
fn delivery_event(delivery: Delivery) -> Event {
    match delivery {
        Delivery::Result(entry) => Event::default()
            .event("result")
            .json_data(&*entry)
            .unwrap_or_else(|e| error_event(&format!("failed to encode result: {e}"))),
        Delivery::Failed(message) => error_event(&message),
    }
}

fn error_event(message: &str) -> Event {
    let body = serde_json::json!({ "error": message });
    Event::default().event("error").data(body.to_string())
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /search/{keyword}`: open a subscription as an SSE stream.
async fn handle_subscribe(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Path(keyword): Path<String>,
) -> Response {
    let keyword = keyword.trim().to_owned();
    if keyword.is_empty() {
        return error_response(&SearchError::InvalidKeyword);
    }

    let connection_id = connection_id(&headers, peer);
    let (tx, rx) = mpsc::channel(SINK_CAPACITY);
    let guard = match state.connections.try_add(&connection_id, &keyword, tx) {
        Ok(guard) => guard,
        Err(e) => {
            info!(%connection_id, "subscription rejected: already open");
            return error_response(&e);
        }
    };

    info!(%connection_id, "subscription opened");
    debug!(%connection_id, %keyword, "subscription keyword");
    tokio::spawn(SubscriptionDelivery::new(Arc::clone(&state.orchestrator), guard).run());

    let sse = Sse::new(delivery_stream(rx)).keep_alive(KeepAlive::default());
    ([(header::CONNECTION, "keep-alive")], sse).into_response()
}

/// Forward deliveries until the loop drops its sink.
///
/// Dropping this stream (client gone) closes the channel, which ends the
/// delivery loop.
fn delivery_stream(
    mut rx: mpsc::Receiver<Delivery>,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> {
    async_stream::stream! {
        while let Some(delivery) = rx.recv().await {
            yield Ok(delivery_event(delivery));
        }
    }
}

/// `PUT /search/block`: exclude an associative word for a keyword.
async fn handle_block(
    State(state): State<AppState>,
    Json(request): Json<BlockRequest>,
) -> Response {
    match state
        .orchestrator
        .block_associative_keyword(&request.search_keyword, &request.block_keyword)
        .await
    {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /search/{keyword}`: drop the cached result.
async fn handle_remove(State(state): State<AppState>, Path(keyword): Path<String>) -> Response {
    match state.orchestrator.remove_result(&keyword).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /search/{keyword}/subscriptions`: server-side cancellation.
async fn handle_cancel_subscriptions(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Json<CancelResponse> {
    let cancelled = state.connections.cancel_keyword(keyword.trim());
    info!(cancelled, "subscriptions cancelled by request");
    Json(CancelResponse { cancelled })
}

/// `GET /health`: providers and open subscriptions.
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let providers = state
        .orchestrator
        .providers()
        .status()
        .into_iter()
        .map(|(kind, available)| ProviderStatus {
            kind: kind.to_string(),
            available,
        })
        .collect();

    Json(HealthResponse {
        status: "ok".to_owned(),
        providers,
        subscriptions: state.connections.len(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use associa_search::SearchResultCache;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.7:51234".parse().unwrap()
    }

    #[test]
    fn connection_id_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION_ID_HEADER, HeaderValue::from_static("tab-42"));
        assert_eq!(connection_id(&headers, peer()), "tab-42");
    }

    #[test]
    fn connection_id_falls_back_to_peer() {
        assert_eq!(connection_id(&HeaderMap::new(), peer()), "10.0.0.7:51234");

        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION_ID_HEADER, HeaderValue::from_static("   "));
        assert_eq!(connection_id(&headers, peer()), "10.0.0.7:51234");
    }

    #[test]
    fn duplicate_subscription_maps_to_bad_gateway() {
        let err = SearchError::DuplicateSubscription {
            connection_id: "c".into(),
            keyword: "k".into(),
        };
        assert_eq!(status_for(&err), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(&SearchError::InvalidKeyword), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&SearchError::ProviderUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&SearchError::Cache("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn block_request_uses_camel_case() {
        let json = r#"{"searchKeyword":"rust","blockKeyword":"cargo"}"#;
        let request: BlockRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.search_keyword, "rust");
        assert_eq!(request.block_keyword, "cargo");
    }

    #[test]
    fn result_cache_serializes_camel_case() {
        let entry = SearchResultCache {
            results: vec![],
            associative_words: vec!["cargo".into()],
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"associativeWords\":[\"cargo\"]"));
    }

    #[test]
    fn error_body_shape() {
        let json = serde_json::to_value(ErrorResponse {
            error: "no search provider available".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"error": "no search provider available"}));
    }
}
