//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Instant;

use initiative_core::config::AppConfig;
use initiative_core::{AppError, AppResult};
use initiative_core::types::SessionCode;
use initiative_entity::Session;
use initiative_realtime::RealtimeEngine;
use initiative_store::SessionStore;

/// Application state passed to every handler via `State<AppState>`.
///
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Session store, shared with the realtime engine.
    pub store: Arc<SessionStore>,
    /// WebSocket realtime engine.
    pub realtime: RealtimeEngine,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Builds the store and realtime engine from configuration.
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(SessionStore::new(&config.session));
        Self::with_store(config, store)
    }

    /// Builds state around an existing store.
    pub fn with_store(config: AppConfig, store: Arc<SessionStore>) -> Self {
        let realtime = RealtimeEngine::new(config.realtime.clone(), Arc::clone(&store));
        Self {
            config: Arc::new(config),
            store,
            realtime,
            started_at: Instant::now(),
        }
    }

    /// Resolves a path segment to an existing session.
    pub fn resolve_session(&self, raw_code: &str) -> AppResult<Session> {
        SessionCode::parse(raw_code)
            .and_then(|code| self.store.get(&code))
            .ok_or_else(|| AppError::not_found("session not found"))
    }
}
