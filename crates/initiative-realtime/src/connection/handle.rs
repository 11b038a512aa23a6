//! Subscriber handle: one connected viewer of a session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use initiative_core::types::{ConnectionId, SubscriberId};
use initiative_entity::Viewer;

/// Serialized outbound payload, shared by every subscriber of one role.
pub type Payload = Arc<str>;

/// Result of offering a payload to a subscriber's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for the writer task.
    Delivered,
    /// The queue was full; this payload was discarded.
    Dropped,
    /// The writer side is gone.
    Closed,
}

/// A handle to one registered connection.
///
/// Holds the producer end of the bounded outbound queue plus the identity
/// and role the connection was registered with.
#[derive(Debug)]
pub struct Subscriber {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// Stable identity of the user behind the connection.
    pub uid: SubscriberId,
    /// Whether `uid` owns the session this connection watches.
    pub is_owner: bool,
    sender: mpsc::Sender<Payload>,
    alive: AtomicBool,
}

impl Subscriber {
    /// Create a subscriber and the receiving end of its outbound queue.
    ///
    /// `capacity` is clamped to at least one slot.
    pub fn new(
        uid: SubscriberId,
        is_owner: bool,
        capacity: usize,
    ) -> (Arc<Self>, mpsc::Receiver<Payload>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let subscriber = Arc::new(Self {
            id: ConnectionId::new(),
            uid,
            is_owner,
            sender,
            alive: AtomicBool::new(true),
        });
        (subscriber, receiver)
    }

    /// The role this subscriber views the session as.
    pub fn viewer(&self) -> Viewer {
        if self.is_owner {
            Viewer::Owner
        } else {
            Viewer::Participant
        }
    }

    /// Offer a payload without waiting.
    pub fn deliver(&self, payload: Payload) -> Delivery {
        if !self.is_alive() {
            return Delivery::Closed;
        }
        match self.sender.try_send(payload) {
            Ok(()) => Delivery::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, uid = %self.uid, "Outbound queue full, dropping state update");
                Delivery::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                Delivery::Closed
            }
        }
    }

    /// Check if connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as closed.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
