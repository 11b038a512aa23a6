//! Subscriber registry: session code → connected subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use initiative_core::types::{ConnectionId, SessionCode};

use crate::connection::handle::Subscriber;

/// Registry of connected subscribers, grouped by session.
///
/// A session entry exists only while it has at least one subscriber.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    sessions: DashMap<SessionCode, HashMap<ConnectionId, Arc<Subscriber>>>,
}

impl SubscriberRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Re-adding the same connection is a no-op.
    pub fn add(&self, code: &SessionCode, subscriber: Arc<Subscriber>) {
        self.sessions
            .entry(code.clone())
            .or_default()
            .entry(subscriber.id)
            .or_insert(subscriber);
    }

    /// Deregisters a subscriber, dropping the session entry once empty.
    ///
    /// Returns whether the connection was registered.
    pub fn remove(&self, code: &SessionCode, conn_id: ConnectionId) -> bool {
        let removed = match self.sessions.get_mut(code) {
            Some(mut subscribers) => subscribers.remove(&conn_id).is_some(),
            None => false,
        };
        // Emptiness is re-checked under the shard lock so a concurrent add
        // between the two steps is never discarded.
        self.sessions
            .remove_if(code, |_, subscribers| subscribers.is_empty());
        removed
    }

    /// Snapshot of a session's subscribers.
    pub fn subscribers(&self, code: &SessionCode) -> Vec<Arc<Subscriber>> {
        self.sessions
            .get(code)
            .map(|entry| entry.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of subscribers registered for a session.
    pub fn subscriber_count(&self, code: &SessionCode) -> usize {
        self.sessions.get(code).map(|entry| entry.len()).unwrap_or(0)
    }

    /// Number of sessions with at least one subscriber.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Total subscribers across all sessions.
    pub fn total_subscribers(&self) -> usize {
        self.sessions.iter().map(|entry| entry.len()).sum()
    }
}
