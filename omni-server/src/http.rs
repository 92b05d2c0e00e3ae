//! OmniStudio HTTP REST API
//!
//! Axum-based HTTP server exposing session management, the seven generation
//! endpoints, history, and platform stats.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a
//! pure inner function. The inner functions are directly testable without
//! axum dispatch machinery.
//!
//! Endpoints:
//! - GET  /api/                      — liveness banner
//! - GET  /api/health                — health check with DB status
//! - POST /api/sessions              — create a session
//! - GET  /api/sessions/{id}         — fetch a session
//! - POST /api/ai/website            — website generation
//! - POST /api/ai/game               — game generation
//! - POST /api/ai/content            — content generation
//! - POST /api/ai/image              — image generation
//! - POST /api/ai/code               — code generation
//! - POST /api/ai/data               — data analysis
//! - POST /api/ai/creative           — creative writing
//! - GET  /api/history/{session_id}  — session history (query param `limit`)
//! - GET  /api/generations/{id}      — fetch one generation record
//! - GET  /api/stats/platform        — platform-wide counters

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use omni_core::models::request::{
    CodeRequest, ContentRequest, CreativeRequest, DataRequest, GameRequest, ImageRequest,
    ModuleRequest, WebsiteRequest,
};
use omni_core::provider::GenerationProvider;
use omni_core::{OmniConfig, OmniError};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::subsystems::{generate, records, sessions, stats};

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub pool: PgPool,
    pub config: OmniConfig,
    pub provider: Arc<dyn GenerationProvider>,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/api/", get(root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/sessions", post(create_session_handler))
        .route("/api/sessions/:id", get(get_session_handler))
        .route("/api/ai/website", post(website_handler))
        .route("/api/ai/game", post(game_handler))
        .route("/api/ai/content", post(content_handler))
        .route("/api/ai/image", post(image_handler))
        .route("/api/ai/code", post(code_handler))
        .route("/api/ai/data", post(data_handler))
        .route("/api/ai/creative", post(creative_handler))
        .route("/api/history/:session_id", get(history_handler))
        .route("/api/generations/:id", get(get_generation_handler))
        .route("/api/stats/platform", get(platform_stats_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    pool: PgPool,
    config: OmniConfig,
    provider: Arc<dyn GenerationProvider>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState {
        pool,
        config,
        provider,
    });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("OmniStudio HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct CreateSessionRequest {
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner liveness banner (pure, no IO).
pub fn root_inner() -> serde_json::Value {
    serde_json::json!({
        "message": "OmniStudio API is running",
        "version": env!("CARGO_PKG_VERSION"),
    })
}

/// Inner health check — queries DB and returns (status_code, json_body).
pub async fn health_inner(pool: &PgPool) -> (StatusCode, serde_json::Value) {
    match omni_core::db::health_check(pool).await {
        Ok(pg_ver) => (
            StatusCode::OK,
            serde_json::json!({
                "status": "healthy",
                "database": "connected",
                "postgresql": pg_ver,
                "version": env!("CARGO_PKG_VERSION"),
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "status": "unhealthy",
                "error": e.to_string(),
            }),
        ),
    }
}

/// Inner session creation — the client's user agent is kept as metadata.
pub async fn create_session_inner(
    pool: &PgPool,
    req: CreateSessionRequest,
) -> (StatusCode, serde_json::Value) {
    let metadata = serde_json::json!({ "user_agent": req.user_agent });

    match sessions::create_session(pool, metadata).await {
        Ok(session) => (StatusCode::OK, to_json(&session)),
        Err(e) => error_to_http(e),
    }
}

/// Inner session fetch — an unparseable id is indistinguishable from an
/// unknown one (404).
pub async fn get_session_inner(pool: &PgPool, id: &str) -> (StatusCode, serde_json::Value) {
    let Ok(id) = Uuid::parse_str(id) else {
        return error_to_http(OmniError::NotFound("Session".to_string()));
    };

    match sessions::get_session(pool, id).await {
        Ok(session) => (StatusCode::OK, to_json(&session)),
        Err(e) => error_to_http(e),
    }
}

/// Inner generation submit — shared by all seven module endpoints. Provider
/// failures come back as a 200 with a `failed` record; only storage failures
/// surface as errors.
pub async fn generate_inner(
    state: &HttpState,
    request: ModuleRequest,
) -> (StatusCode, serde_json::Value) {
    match generate::submit(&state.pool, state.provider.as_ref(), request).await {
        Ok(generation) => (StatusCode::OK, to_json(&generation)),
        Err(e) => error_to_http(e),
    }
}

/// Inner generation fetch.
pub async fn get_generation_inner(pool: &PgPool, id: &str) -> (StatusCode, serde_json::Value) {
    let Ok(id) = Uuid::parse_str(id) else {
        return error_to_http(OmniError::NotFound("Generation".to_string()));
    };

    match records::get(pool, id).await {
        Ok(generation) => (StatusCode::OK, to_json(&generation)),
        Err(e) => error_to_http(e),
    }
}

/// Inner history listing.
pub async fn history_inner(
    pool: &PgPool,
    session_id: &str,
    limit: Option<i64>,
) -> (StatusCode, serde_json::Value) {
    match stats::history(pool, session_id, limit).await {
        Ok(history) => (StatusCode::OK, to_json(&history)),
        Err(e) => error_to_http(e),
    }
}

/// Inner platform stats.
pub async fn platform_stats_inner(pool: &PgPool) -> (StatusCode, serde_json::Value) {
    match stats::platform_stats(pool).await {
        Ok(report) => (StatusCode::OK, to_json(&report)),
        Err(e) => error_to_http(e),
    }
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn root_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(root_inner()))
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.pool).await;
    (status, Json(body))
}

pub async fn create_session_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<CreateSessionRequest>,
) -> impl IntoResponse {
    let (status, body) = create_session_inner(&state.pool, req).await;
    (status, Json(body))
}

pub async fn get_session_handler(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let (status, body) = get_session_inner(&state.pool, &id).await;
    (status, Json(body))
}

pub async fn website_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<WebsiteRequest>,
) -> impl IntoResponse {
    let (status, body) = generate_inner(&state, ModuleRequest::Website(req)).await;
    (status, Json(body))
}

pub async fn game_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<GameRequest>,
) -> impl IntoResponse {
    let (status, body) = generate_inner(&state, ModuleRequest::Game(req)).await;
    (status, Json(body))
}

pub async fn content_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<ContentRequest>,
) -> impl IntoResponse {
    let (status, body) = generate_inner(&state, ModuleRequest::Content(req)).await;
    (status, Json(body))
}

pub async fn image_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<ImageRequest>,
) -> impl IntoResponse {
    let (status, body) = generate_inner(&state, ModuleRequest::Image(req)).await;
    (status, Json(body))
}

pub async fn code_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<CodeRequest>,
) -> impl IntoResponse {
    let (status, body) = generate_inner(&state, ModuleRequest::Code(req)).await;
    (status, Json(body))
}

pub async fn data_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<DataRequest>,
) -> impl IntoResponse {
    let (status, body) = generate_inner(&state, ModuleRequest::Data(req)).await;
    (status, Json(body))
}

pub async fn creative_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<CreativeRequest>,
) -> impl IntoResponse {
    let (status, body) = generate_inner(&state, ModuleRequest::Creative(req)).await;
    (status, Json(body))
}

pub async fn history_handler(
    State(state): State<Arc<HttpState>>,
    Path(session_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let (status, body) = history_inner(&state.pool, &session_id, query.limit).await;
    (status, Json(body))
}

pub async fn get_generation_handler(
    State(state): State<Arc<HttpState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let (status, body) = get_generation_inner(&state.pool, &id).await;
    (status, Json(body))
}

pub async fn platform_stats_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = platform_stats_inner(&state.pool).await;
    (status, Json(body))
}

// ============================================================================
// Helpers
// ============================================================================

/// Map a service error to its HTTP status and error envelope.
pub fn error_to_http(e: OmniError) -> (StatusCode, serde_json::Value) {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, to_json(&ErrorResponse::new(e.to_string())))
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|_| serde_json::json!({}))
}

// ============================================================================
// Unit Tests — pure helpers; everything touching the pool lives in tests/
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_inner_pure() {
        let v = root_inner();
        assert_eq!(v["message"], "OmniStudio API is running");
        assert!(v["version"].is_string(), "version must be string");
    }

    #[test]
    fn test_error_to_http_not_found_is_404() {
        let (status, body) = error_to_http(OmniError::NotFound("Session".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "Session not found");
    }

    #[test]
    fn test_error_to_http_other_is_500() {
        let (status, body) = error_to_http(OmniError::Other("boom".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["error"].as_str().unwrap().contains("boom"));
    }

    #[test]
    fn test_error_response_envelope() {
        let e = ErrorResponse::new("nope");
        let v = to_json(&e);
        assert_eq!(v["error"], "nope");
        assert_eq!(v["status"], "error");
    }
}
