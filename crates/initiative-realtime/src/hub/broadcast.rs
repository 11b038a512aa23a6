//! Role-redacted full-state fanout.

use std::sync::Arc;

use tracing::{debug, error};

use initiative_core::types::{ConnectionId, SessionCode};
use initiative_entity::{Session, Viewer};

use super::registry::SubscriberRegistry;
use crate::connection::handle::{Delivery, Payload, Subscriber};
use crate::message::serializer;
use crate::metrics::{RealtimeMetrics, deliveries};

/// Per-subscriber results of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Payloads queued.
    pub delivered: usize,
    /// Payloads discarded on a full queue.
    pub dropped: usize,
    /// Subscribers whose writer had already gone away.
    pub closed: usize,
}

impl BroadcastReport {
    /// Subscribers attempted.
    pub fn attempted(&self) -> usize {
        self.delivered + self.dropped + self.closed
    }
}

/// Registry of live subscribers plus the fanout over them.
#[derive(Debug)]
pub struct BroadcastHub {
    registry: SubscriberRegistry,
    metrics: Arc<RealtimeMetrics>,
}

impl BroadcastHub {
    /// Creates an empty hub.
    pub fn new(metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            registry: SubscriberRegistry::new(),
            metrics,
        }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    /// Registers a subscriber under a session.
    pub fn add_subscriber(&self, code: &SessionCode, subscriber: Arc<Subscriber>) {
        debug!(session = %code, conn_id = %subscriber.id, uid = %subscriber.uid, "Subscriber added");
        self.registry.add(code, subscriber);
    }

    /// Deregisters a subscriber.
    pub fn remove_subscriber(&self, code: &SessionCode, conn_id: ConnectionId) -> bool {
        let removed = self.registry.remove(code, conn_id);
        if removed {
            debug!(session = %code, conn_id = %conn_id, "Subscriber removed");
        }
        removed
    }

    /// Pushes `session` to every subscriber of `code`, never waiting on a
    /// slow one.
    ///
    /// Each role's payload is serialized at most once and shared.
    pub fn broadcast(&self, code: &SessionCode, session: &Session) -> BroadcastReport {
        let subscribers = self.registry.subscribers(code);
        let mut report = BroadcastReport::default();
        if subscribers.is_empty() {
            return report;
        }

        let mut owner_payload: Option<Payload> = None;
        let mut participant_payload: Option<Payload> = None;

        for subscriber in &subscribers {
            let viewer = subscriber.viewer();
            let cached = match viewer {
                Viewer::Owner => &mut owner_payload,
                Viewer::Participant => &mut participant_payload,
            };
            if cached.is_none() {
                *cached = render(session, viewer);
            }
            let Some(payload) = cached.as_ref().map(Arc::clone) else {
                continue;
            };

            match subscriber.deliver(payload) {
                Delivery::Delivered => report.delivered += 1,
                Delivery::Dropped => report.dropped += 1,
                Delivery::Closed => report.closed += 1,
            }
        }

        deliveries::record_broadcast(
            &self.metrics,
            report.delivered as u64,
            report.dropped as u64,
        );
        debug!(
            session = %code,
            delivered = report.delivered,
            dropped = report.dropped,
            closed = report.closed,
            "State broadcast"
        );
        report
    }

    /// Pushes `session` to a single subscriber.
    pub fn push_to(&self, subscriber: &Subscriber, session: &Session) -> Delivery {
        match render(session, subscriber.viewer()) {
            Some(payload) => subscriber.deliver(payload),
            None => Delivery::Dropped,
        }
    }
}

fn render(session: &Session, viewer: Viewer) -> Option<Payload> {
    match serializer::state_payload(session.view(viewer)) {
        Ok(payload) => Some(payload),
        Err(e) => {
            error!(session = %session.code(), error = %e, "Failed to serialize state");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use initiative_core::types::SubscriberId;
    use initiative_entity::Entity;
    use serde_json::Value;
    use tokio::sync::mpsc;

    fn code() -> SessionCode {
        SessionCode::parse("ABCD").expect("code")
    }

    fn session() -> Session {
        let dm = SubscriberId::from("dm");
        let mut s = Session::new(code(), dm.clone());
        s.add_entity(Entity::monster("Goblin", 7, 10, 2, dm));
        s
    }

    fn hub() -> BroadcastHub {
        BroadcastHub::new(Arc::new(RealtimeMetrics::new()))
    }

    fn recv_json(rx: &mut mpsc::Receiver<Payload>) -> Value {
        let payload = rx.try_recv().expect("payload");
        serde_json::from_str(&payload).expect("json")
    }

    #[test]
    fn test_roles_get_their_own_view() {
        let hub = hub();
        let (dm, mut dm_rx) = Subscriber::new(SubscriberId::from("dm"), true, 4);
        let (p1, mut p1_rx) = Subscriber::new(SubscriberId::from("p1"), false, 4);
        let (p2, mut p2_rx) = Subscriber::new(SubscriberId::from("p2"), false, 4);
        hub.add_subscriber(&code(), dm);
        hub.add_subscriber(&code(), p1);
        hub.add_subscriber(&code(), p2);

        let report = hub.broadcast(&code(), &session());
        assert_eq!(report.delivered, 3);

        assert_eq!(recv_json(&mut dm_rx)["data"]["entries"][0]["hp"], 7);
        for rx in [&mut p1_rx, &mut p2_rx] {
            let json = recv_json(rx);
            assert_eq!(json["data"]["entries"][0]["hp"], 0);
            assert_eq!(json["data"]["entries"][0]["maxHp"], 0);
        }
    }

    #[test]
    fn test_full_queue_drops_then_recovers_with_current_state() {
        let hub = hub();
        let (slow, mut slow_rx) = Subscriber::new(SubscriberId::from("dm"), true, 1);
        let (fast, mut fast_rx) = Subscriber::new(SubscriberId::from("p1"), false, 8);
        hub.add_subscriber(&code(), slow);
        hub.add_subscriber(&code(), fast);

        let mut state = session();
        assert_eq!(hub.broadcast(&code(), &state).delivered, 2);

        state.next_turn();
        let report = hub.broadcast(&code(), &state);
        assert_eq!((report.delivered, report.dropped), (1, 1));

        // Drain the stale payload, then the next broadcast carries round 3.
        assert_eq!(recv_json(&mut slow_rx)["data"]["round"], 1);
        state.next_turn();
        assert_eq!(hub.broadcast(&code(), &state).delivered, 2);
        assert_eq!(recv_json(&mut slow_rx)["data"]["round"], 3);

        for expected in [1, 2, 3] {
            assert_eq!(recv_json(&mut fast_rx)["data"]["round"], expected);
        }
    }

    #[test]
    fn test_closed_subscriber_does_not_stop_fanout() {
        let hub = hub();
        let (gone, gone_rx) = Subscriber::new(SubscriberId::from("p1"), false, 4);
        let (here, mut here_rx) = Subscriber::new(SubscriberId::from("p2"), false, 4);
        hub.add_subscriber(&code(), gone);
        hub.add_subscriber(&code(), here);
        drop(gone_rx);

        let report = hub.broadcast(&code(), &session());
        assert_eq!((report.delivered, report.closed), (1, 1));
        assert_eq!(report.attempted(), 2);
        assert!(here_rx.try_recv().is_ok());
    }

    #[test]
    fn test_last_removal_leaves_no_entry() {
        let hub = hub();
        let (sub, _rx) = Subscriber::new(SubscriberId::from("p1"), false, 4);
        let id = sub.id;
        hub.add_subscriber(&code(), sub);
        assert_eq!(hub.registry().session_count(), 1);
        assert!(hub.remove_subscriber(&code(), id));
        assert_eq!(hub.registry().session_count(), 0);
        assert_eq!(hub.broadcast(&code(), &session()).attempted(), 0);
    }

    #[test]
    fn test_push_to_single_subscriber() {
        let hub = hub();
        let (sub, mut rx) = Subscriber::new(SubscriberId::from("p1"), false, 4);
        assert_eq!(hub.push_to(&sub, &session()), Delivery::Delivered);
        assert_eq!(recv_json(&mut rx)["type"], "state");
    }
}
