//! Response DTOs.

use serde::{Deserialize, Serialize};

use initiative_core::types::SessionCode;
use initiative_entity::Session;
use initiative_realtime::metrics::MetricsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Session lookup result for the requesting identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session code.
    pub code: SessionCode,
    /// Whether the caller owns the session.
    pub is_dm: bool,
    /// Current round.
    pub round: u32,
    /// Current turn index.
    pub turn: usize,
    /// Entities in the turn order.
    pub entity_count: usize,
}

impl SessionSummary {
    /// Summarizes `session` for a caller.
    pub fn new(session: &Session, is_dm: bool) -> Self {
        Self {
            code: session.code().clone(),
            is_dm,
            round: session.round(),
            turn: session.turn(),
            entity_count: session.entities().len(),
        }
    }
}

/// Basic health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
}

/// Health check with live counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Live sessions in the store.
    pub sessions: usize,
    /// Sessions with at least one connected viewer.
    pub watched_sessions: usize,
    /// Connected WebSocket subscribers.
    pub ws_connections: usize,
    /// Realtime counters.
    pub realtime: MetricsSnapshot,
}
