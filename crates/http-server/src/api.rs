//! HTTP API handlers and routes using axum.
//!
//! Routes:
//! - GET /healthcheck - Liveness probe, no dependency checks
//! - GET /pair/{symbol}/price - Live price of a canonical symbol on every exchange

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

use scraper_price_feed::QueryService;

pub const HEALTHCHECK_BODY: &str = "I'm alive!";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub query: QueryService,
}

impl AppState {
    pub fn new(query: QueryService) -> Self {
        Self { query }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck_handler))
        .route("/pair/{symbol}/price", get(pair_price_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /healthcheck
async fn healthcheck_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        HEALTHCHECK_BODY,
    )
}

/// GET /pair/{symbol}/price
async fn pair_price_handler(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Response {
    let prices = state.query.lookup(&symbol).await;
    render_json(&prices)
}

/// Pretty JSON with 200, or a plain-text 400 if encoding fails
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Response {
    match serde_json::to_string_pretty(value) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => ApiError::Serialization(e.to_string()).into_response(),
    }
}

// ============================================================================
// Error handling
// ============================================================================

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    Serialization(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Serialization(msg) => {
                error!(error = %msg, "Failed to encode response");
                (
                    StatusCode::BAD_REQUEST,
                    [(header::CONTENT_TYPE, "text/plain")],
                    format!("Bad request, check uri! Error: {msg}"),
                )
                    .into_response()
            }
        }
    }
}
