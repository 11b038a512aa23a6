//! # initiative-realtime
//!
//! Live fanout for encounter sessions:
//!
//! - Broadcast hub: per-session subscriber registry and non-blocking,
//!   role-redacted full-state fanout over bounded queues
//! - Command router: typed inbound commands, owner-only authority checks,
//!   store mutation, then broadcast
//! - Connection driver: the reader/writer task pair behind one socket
//! - Metrics counters for connections, commands, and deliveries

pub mod connection;
pub mod hub;
pub mod message;
pub mod metrics;
pub mod router;
pub mod server;

pub use connection::driver::{Frame, run_connection};
pub use connection::handle::{Delivery, Payload, Subscriber};
pub use hub::BroadcastHub;
pub use message::{InboundCommand, OutboundMessage};
pub use metrics::RealtimeMetrics;
pub use router::{CommandContext, CommandOutcome, CommandRouter};
pub use server::RealtimeEngine;
