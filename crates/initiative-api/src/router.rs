//! Route definitions for the HTTP API.
//!
//! JSON endpoints live under `/api`; the join form, its `/g/{code}`
//! landing route, and the WebSocket upgrade sit at the root where browsers
//! post and connect to them.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes, threading `state` through every
/// handler.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(session_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/join", post(handlers::session::join))
        .route("/g/{code}", get(handlers::session::get_session))
        .route("/ws/{code}", get(handlers::ws::ws_upgrade))
        .with_state(state)
}

/// Session lookup
fn session_routes() -> Router<AppState> {
    Router::new().route("/sessions/{code}", get(handlers::session::get_session))
}

/// Health checks
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
