//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let registry = state.realtime.hub.registry();

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: "ok".to_string(),
        sessions: state.store.session_count(),
        watched_sessions: registry.session_count(),
        ws_connections: registry.total_subscribers(),
        realtime: state.realtime.metrics.snapshot(),
    }))
}
