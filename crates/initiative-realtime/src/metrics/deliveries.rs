//! Fanout metrics helpers.

use std::sync::atomic::Ordering;

use super::RealtimeMetrics;

/// Record one broadcast with its per-subscriber results.
pub fn record_broadcast(metrics: &RealtimeMetrics, delivered: u64, dropped: u64) {
    metrics.broadcasts.fetch_add(1, Ordering::Relaxed);
    metrics
        .payloads_delivered
        .fetch_add(delivered, Ordering::Relaxed);
    metrics.payloads_dropped.fetch_add(dropped, Ordering::Relaxed);
}
