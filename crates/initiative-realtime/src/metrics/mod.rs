//! Realtime engine metrics.

pub mod commands;
pub mod connections;
pub mod deliveries;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Total connections ever registered.
    pub connections_total: AtomicU64,
    /// Connections currently registered.
    pub connections_active: AtomicU64,
    /// Commands that changed session state.
    pub commands_applied: AtomicU64,
    /// Commands that were valid but changed nothing or lacked authority.
    pub commands_ignored: AtomicU64,
    /// Frames that could not be parsed.
    pub commands_malformed: AtomicU64,
    /// Broadcast calls.
    pub broadcasts: AtomicU64,
    /// Payloads accepted into an outbound queue.
    pub payloads_delivered: AtomicU64,
    /// Payloads dropped because a queue was full.
    pub payloads_dropped: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            commands_ignored: self.commands_ignored.load(Ordering::Relaxed),
            commands_malformed: self.commands_malformed.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            payloads_delivered: self.payloads_delivered.load(Ordering::Relaxed),
            payloads_dropped: self.payloads_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever registered.
    pub connections_total: u64,
    /// Connections currently registered.
    pub connections_active: u64,
    /// Commands that changed session state.
    pub commands_applied: u64,
    /// Commands ignored as no-ops or unauthorized.
    pub commands_ignored: u64,
    /// Frames that could not be parsed.
    pub commands_malformed: u64,
    /// Broadcast calls.
    pub broadcasts: u64,
    /// Payloads accepted into an outbound queue.
    pub payloads_delivered: u64,
    /// Payloads dropped on a full queue.
    pub payloads_dropped: u64,
}
