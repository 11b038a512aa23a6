//! # initiative-api
//!
//! HTTP surface for the initiative tracker built on Axum.
//!
//! Provides the join and session lookup endpoints, the WebSocket upgrade
//! into the realtime engine, health checks, the identity cookie extractor,
//! CORS and tracing layers, and `AppError` to HTTP mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
