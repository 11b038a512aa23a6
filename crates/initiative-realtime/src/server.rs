//! Top-level real-time engine that ties the hub, router, and store together.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use initiative_core::config::RealtimeConfig;
use initiative_core::types::{SessionCode, SubscriberId};
use initiative_store::SessionStore;

use crate::connection::handle::{Payload, Subscriber};
use crate::hub::BroadcastHub;
use crate::metrics::{RealtimeMetrics, connections};
use crate::router::CommandRouter;

/// Central real-time engine shared by every connection.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    /// Authoritative session state.
    pub store: Arc<SessionStore>,
    /// Subscriber registry and fanout.
    pub hub: Arc<BroadcastHub>,
    /// Inbound command router.
    pub router: Arc<CommandRouter>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
    shutdown: CancellationToken,
}

impl RealtimeEngine {
    /// Creates a new engine over `store`.
    pub fn new(config: RealtimeConfig, store: Arc<SessionStore>) -> Self {
        let metrics = Arc::new(RealtimeMetrics::new());
        let hub = Arc::new(BroadcastHub::new(Arc::clone(&metrics)));
        let router = Arc::new(CommandRouter::new(
            Arc::clone(&store),
            Arc::clone(&hub),
            Arc::clone(&metrics),
            config.max_message_size,
        ));

        info!(
            queue_capacity = config.outbound_queue_capacity,
            max_message_size = config.max_message_size,
            "Real-time engine initialized"
        );

        Self {
            store,
            hub,
            router,
            metrics,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Registers a connection for `uid` on session `code`.
    ///
    /// The new subscriber is sent the current state immediately. Returns
    /// `None` when the session does not exist.
    pub fn register(
        &self,
        code: &SessionCode,
        uid: SubscriberId,
    ) -> Option<(Arc<Subscriber>, mpsc::Receiver<Payload>)> {
        let is_owner = self.store.inspect(code, |session| session.is_owner(&uid))?;
        let (subscriber, receiver) =
            Subscriber::new(uid, is_owner, self.config.outbound_queue_capacity);

        self.hub.add_subscriber(code, Arc::clone(&subscriber));
        connections::record_connect(&self.metrics);
        self.store
            .inspect(code, |session| self.hub.push_to(&subscriber, session));

        info!(
            session = %code,
            conn_id = %subscriber.id,
            uid = %subscriber.uid,
            is_owner,
            "WebSocket connection registered"
        );
        Some((subscriber, receiver))
    }

    /// Removes a connection from its session.
    pub fn unregister(&self, code: &SessionCode, subscriber: &Subscriber) {
        subscriber.mark_closed();
        if self.hub.remove_subscriber(code, subscriber.id) {
            connections::record_disconnect(&self.metrics);
            info!(
                session = %code,
                conn_id = %subscriber.id,
                uid = %subscriber.uid,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Token cancelled when the engine shuts down. Connection tokens are
    /// children of it.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Signals every connection to close.
    pub fn shutdown(&self) {
        info!(
            active = self.hub.registry().total_subscribers(),
            "Shutting down real-time engine"
        );
        self.shutdown.cancel();
    }
}
