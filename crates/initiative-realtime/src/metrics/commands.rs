//! Command metrics helpers.

use std::sync::atomic::Ordering;

use super::RealtimeMetrics;

/// Record a command that changed state.
pub fn record_applied(metrics: &RealtimeMetrics) {
    metrics.commands_applied.fetch_add(1, Ordering::Relaxed);
}

/// Record a command that was ignored.
pub fn record_ignored(metrics: &RealtimeMetrics) {
    metrics.commands_ignored.fetch_add(1, Ordering::Relaxed);
}

/// Record an unparseable frame.
pub fn record_malformed(metrics: &RealtimeMetrics) {
    metrics.commands_malformed.fetch_add(1, Ordering::Relaxed);
}
