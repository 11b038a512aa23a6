//! Broadcast hub: who is watching which session, and fanout to them.

pub mod broadcast;
pub mod registry;

pub use broadcast::{BroadcastHub, BroadcastReport};
pub use registry::SubscriberRegistry;
