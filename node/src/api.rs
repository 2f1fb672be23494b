//! # REST API
//!
//! Builds the axum router that exposes the query service over HTTP. All
//! endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                                        | Description                          |
//! |--------|---------------------------------------------|--------------------------------------|
//! | GET    | `/health`                                   | Liveness probe                       |
//! | GET    | `/status`                                   | Service status summary               |
//! | GET    | `/chains`                                   | Registered chains + capabilities     |
//! | GET    | `/v1/:chain/:address`                       | Transactions by address (legacy path)|
//! | GET    | `/v2/:chain/transactions/:address`          | Transactions by address              |
//! | GET    | `/v2/:chain/transactions/account/:account`  | Transactions by account handle       |
//! | GET    | `/v2/:chain/transactions/xpub/:xpub`        | Transactions by extended public key  |
//!
//! The address and account routes accept an optional `?token=` filter.
//! Responses are one atomic page; failures carry `{"error": "<message>"}`
//! with the status code derived from the core's response classification.

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use prism_core::chain::ChainRegistry;
use prism_core::error::{FailureKind, QueryError, ResponseClass, SourceError};
use prism_core::query;
use prism_core::transaction::TransactionPage;

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The service's reported version string.
    pub version: String,
    /// Startup time, for the uptime figure in `/status`.
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// All chain integrations known to this instance. Immutable after startup.
    pub registry: Arc<ChainRegistry>,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/chains", get(chains_handler))
        .route("/v1/:chain/:address", get(address_history_handler))
        .route(
            "/v2/:chain/transactions/:address",
            get(address_history_handler),
        )
        .route(
            "/v2/:chain/transactions/account/:account",
            get(account_history_handler),
        )
        .route(
            "/v2/:chain/transactions/xpub/:xpub",
            get(xpub_history_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Optional query parameters for the address and account routes.
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    /// Token filter. Empty or absent means "native transactions only" on
    /// the address path and "no filter" on the account path.
    pub token: Option<String>,
}

/// Response payload for `GET /status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Service software version.
    pub version: String,
    /// Number of registered chain integrations.
    pub chains: usize,
    /// Seconds since startup.
    pub uptime_seconds: i64,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// One entry of the `GET /chains` listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Chain handle used in request paths.
    pub chain: String,
    /// Capability names this integration implements.
    pub capabilities: Vec<String>,
}

/// Generic error body returned on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 if the service is alive.
///
/// Liveness only; upstream reachability is deliberately not checked here,
/// since a dead upstream must surface per-request as service-unavailable.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — returns a service status summary.
async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let resp = StatusResponse {
        version: state.version.clone(),
        chains: state.registry.len(),
        uptime_seconds: (now - state.started_at).num_seconds(),
        timestamp: now.to_rfc3339(),
    };
    Json(resp)
}

/// `GET /chains` — lists registered chains and their capability sets.
async fn chains_handler(State(state): State<AppState>) -> impl IntoResponse {
    let listing: Vec<ChainInfo> = state
        .registry
        .chains()
        .into_iter()
        .filter_map(|handle| state.registry.get(handle))
        .map(|integration| ChainInfo {
            chain: integration.chain().to_string(),
            capabilities: integration
                .capabilities()
                .names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();
    Json(listing)
}

/// `GET /v1/:chain/:address` and `GET /v2/:chain/transactions/:address` —
/// transaction history for a plain address, optionally token-filtered.
async fn address_history_handler(
    Path((chain, address)): Path<(String, String)>,
    Query(params): Query<TokenQuery>,
    State(state): State<AppState>,
) -> Response {
    let timer = state.metrics.query_latency_seconds.start_timer();
    state.metrics.queries_total.inc();

    let Some(integration) = state.registry.get(&chain) else {
        return unknown_chain(&state, &chain);
    };
    let result =
        query::transactions_by_address(integration.capabilities(), &address, params.token.as_deref())
            .await;

    timer.observe_duration();
    respond(&state, &chain, result)
}

/// `GET /v2/:chain/transactions/account/:account` — transaction history for
/// an account handle, optionally token-filtered.
async fn account_history_handler(
    Path((chain, account)): Path<(String, String)>,
    Query(params): Query<TokenQuery>,
    State(state): State<AppState>,
) -> Response {
    let timer = state.metrics.query_latency_seconds.start_timer();
    state.metrics.queries_total.inc();

    let Some(integration) = state.registry.get(&chain) else {
        return unknown_chain(&state, &chain);
    };
    let result =
        query::transactions_by_account(integration.capabilities(), &account, params.token.as_deref())
            .await;

    timer.observe_duration();
    respond(&state, &chain, result)
}

/// `GET /v2/:chain/transactions/xpub/:xpub` — transaction history for every
/// address derived from an extended public key.
async fn xpub_history_handler(
    Path((chain, xpub)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Response {
    let timer = state.metrics.query_latency_seconds.start_timer();
    state.metrics.queries_total.inc();

    let Some(integration) = state.registry.get(&chain) else {
        return unknown_chain(&state, &chain);
    };
    let result = query::transactions_by_extended_key(integration.capabilities(), &xpub).await;

    timer.observe_duration();
    respond(&state, &chain, result)
}

// ---------------------------------------------------------------------------
// Response Mapping
// ---------------------------------------------------------------------------

/// Maps the core's transport-neutral classification onto HTTP status codes.
fn status_for(class: ResponseClass) -> StatusCode {
    match class {
        ResponseClass::BadRequest => StatusCode::BAD_REQUEST,
        ResponseClass::NotFound => StatusCode::NOT_FOUND,
        ResponseClass::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ResponseClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Renders a query outcome, recording metrics either way.
fn respond(
    state: &AppState,
    chain: &str,
    result: Result<TransactionPage, QueryError>,
) -> Response {
    match result {
        Ok(page) => {
            state
                .metrics
                .transactions_returned_total
                .inc_by(page.total as u64);
            (StatusCode::OK, Json(page)).into_response()
        }
        Err(err) => {
            state.metrics.queries_failed_total.inc();
            if is_upstream_fault(&err) {
                state.metrics.upstream_failures_total.inc();
            }
            let status = status_for(err.response_class());
            tracing::debug!(chain, %status, error = %err, "query failed");
            (
                status,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// True for failures the upstream reported, as opposed to client input
/// errors and integration gaps.
fn is_upstream_fault(err: &QueryError) -> bool {
    matches!(
        err,
        QueryError::Source(SourceError::Kind(
            FailureKind::SourceUnavailable | FailureKind::Internal(_) | FailureKind::NotFound
        )) | QueryError::Source(SourceError::Other(_))
    )
}

/// 404 for a chain handle with no registered integration.
fn unknown_chain(state: &AppState, chain: &str) -> Response {
    state.metrics.queries_failed_total.inc();
    tracing::debug!(chain, "query for unregistered chain");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("unknown chain: {}", chain),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
