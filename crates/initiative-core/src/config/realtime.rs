//! Real-time fanout configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Capacity of each subscriber's outbound queue. A full queue drops
    /// the newest state payload for that subscriber.
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
    /// Inbound frames larger than this are discarded unparsed.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Transport ceiling for a single WebSocket frame. Frames between
    /// `max_message_size` and this reach the router and are dropped there;
    /// only frames above it fail the connection.
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: usize,
}

impl RealtimeConfig {
    /// Frame limit to hand the transport, never below `max_message_size`.
    pub fn transport_frame_limit(&self) -> usize {
        self.max_frame_size.max(self.max_message_size.saturating_mul(2))
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_queue_capacity: default_outbound_queue_capacity(),
            max_message_size: default_max_message_size(),
            max_frame_size: default_max_frame_size(),
        }
    }
}

fn default_outbound_queue_capacity() -> usize {
    8
}

fn default_max_message_size() -> usize {
    65_536
}

fn default_max_frame_size() -> usize {
    16 * 1024 * 1024
}
