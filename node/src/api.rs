//! # REST API
//!
//! Builds the axum router that exposes the wallet service over HTTP.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                          | Description                     |
//! |--------|-------------------------------|---------------------------------|
//! | GET    | `/health`                     | Liveness probe                  |
//! | POST   | `/api/v1/wallet`              | Deposit into / withdraw from    |
//! | GET    | `/api/v1/wallets/:walletId`   | Current balance of one wallet   |
//!
//! Store calls are blocking, so they run on tokio's blocking pool. A client
//! that disconnects mid-request does not cancel its transaction.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use wallet_ledger::config::API_PREFIX;
use wallet_ledger::wallet::{parse_wallet_id, OperationPayload};
use wallet_ledger::{Ledger, OperationOutcome, OperationRequest, Wallet, WalletError};

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
    /// Balance operation handler, owning the wallet store.
    pub ledger: Arc<Ledger>,
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
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(&format!("{API_PREFIX}/wallet"), post(operation_handler))
        .route(&format!("{API_PREFIX}/wallets/:wallet_id"), get(balance_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// Response payload for `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of wallets in the store.
    pub wallets: usize,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps [`WalletError`] onto HTTP status codes.
#[derive(Debug)]
pub struct ApiError(pub WalletError);

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            WalletError::InvalidRequest(_) | WalletError::InsufficientFunds { .. } => {
                StatusCode::BAD_REQUEST
            }
            WalletError::WalletNotFound(_) => StatusCode::NOT_FOUND,
            WalletError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Storage details stay in the logs.
        let message = match &self.0 {
            WalletError::Storage(_) => "storage error".to_string(),
            other => other.to_string(),
        };
        (self.status(), Json(ErrorResponse { error: message })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 while the process is serving.
///
/// Counting wallets walks the whole tree, so it runs off the async workers.
async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let ledger = Arc::clone(&state.ledger);
    let wallets = tokio::task::spawn_blocking(move || ledger.db().wallet_count())
        .await
        .map_err(|e| WalletError::Storage(format!("health task failed: {e}")))?;

    Ok(Json(HealthResponse {
        status: "ok".into(),
        version: state.version.clone(),
        wallets,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

/// `POST /api/v1/wallet` — apply a deposit or withdrawal.
///
/// Any body that fails to decode (bad JSON, missing field, wrong content
/// type) is reported as 400, same as a semantically invalid request.
async fn operation_handler(
    State(state): State<AppState>,
    payload: Result<Json<OperationPayload>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        state.metrics.record("unknown", "invalid_request");
        WalletError::InvalidRequest(rejection.body_text())
    })?;

    let request = OperationRequest::try_from(payload).map_err(|err| {
        state.metrics.record("unknown", err.kind());
        err
    })?;

    let started = Instant::now();
    let result = apply_blocking(&state.ledger, request).await;
    state
        .metrics
        .operation_latency_seconds
        .observe(started.elapsed().as_secs_f64());

    match result {
        Ok(outcome) => {
            state.metrics.record(request.kind.as_str(), "ok");
            if outcome.created() {
                state.metrics.wallets_created_total.inc();
            }
            Ok(outcome.confirmation())
        }
        Err(err) => {
            state.metrics.record(request.kind.as_str(), err.kind());
            Err(err.into())
        }
    }
}

/// `GET /api/v1/wallets/:walletId` — current balance of one wallet.
async fn balance_handler(
    Path(wallet_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Wallet>, ApiError> {
    let wallet_id = parse_wallet_id(&wallet_id)?;
    let ledger = Arc::clone(&state.ledger);

    let wallet = tokio::task::spawn_blocking(move || ledger.balance(&wallet_id))
        .await
        .map_err(|e| WalletError::Storage(format!("balance task failed: {e}")))??;

    Ok(Json(wallet))
}

async fn apply_blocking(
    ledger: &Arc<Ledger>,
    request: OperationRequest,
) -> Result<OperationOutcome, WalletError> {
    let ledger = Arc::clone(ledger);
    tokio::task::spawn_blocking(move || ledger.apply(&request))
        .await
        .map_err(|e| WalletError::Storage(format!("operation task failed: {e}")))?
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
