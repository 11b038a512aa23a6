//! Per-connection reader/writer pair.
//!
//! The writer task drains the subscriber's bounded queue into the
//! transport; the reader loop feeds frames to the command router. They
//! share only the queue and a cancellation token, and either side ending
//! stops the other.

use std::fmt::Display;

use futures::{Sink, SinkExt, Stream, StreamExt};
use tracing::{debug, info, warn};

use initiative_core::types::{SessionCode, SubscriberId};

use super::handle::Payload;
use crate::router::CommandContext;
use crate::server::RealtimeEngine;

/// Transport-neutral inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A text payload carrying one command.
    Data(String),
    /// A binary payload, read as UTF-8 text.
    Binary(Vec<u8>),
    /// The peer closed the connection.
    Close,
    /// Ping, pong, or other frames with no command content.
    Control,
}

/// Drives one connection from registration to removal.
///
/// Returns immediately if the session does not exist. Undelivered payloads
/// are discarded when the connection ends.
pub async fn run_connection<Tx, Rx, E>(
    engine: RealtimeEngine,
    code: SessionCode,
    uid: SubscriberId,
    mut sink: Tx,
    mut stream: Rx,
) where
    Tx: Sink<Payload> + Send + Unpin + 'static,
    Tx::Error: Display + Send,
    Rx: Stream<Item = Result<Frame, E>> + Send + Unpin,
    E: Display + Send,
{
    let Some((subscriber, mut outbound_rx)) = engine.register(&code, uid) else {
        debug!(session = %code, "Connection for unknown session");
        return;
    };

    let conn_id = subscriber.id;
    let cancel = engine.shutdown_token().child_token();

    let writer_cancel = cancel.clone();
    let writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = writer_cancel.cancelled() => break,
                next = outbound_rx.recv() => {
                    let Some(payload) = next else { break };
                    if let Err(e) = sink.send(payload).await {
                        warn!(conn_id = %conn_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
            }
        }
        writer_cancel.cancel();
    });

    let ctx = CommandContext {
        code: code.clone(),
        uid: subscriber.uid.clone(),
        is_owner: subscriber.is_owner,
    };

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            next = stream.next() => next,
        };
        match next {
            Some(Ok(Frame::Data(text))) => {
                let outcome = engine.router.handle_raw(&ctx, &text);
                debug!(conn_id = %conn_id, ?outcome, "Frame handled");
            }
            Some(Ok(Frame::Binary(bytes))) => {
                let outcome = engine.router.handle_bytes(&ctx, &bytes);
                debug!(conn_id = %conn_id, ?outcome, "Binary frame handled");
            }
            Some(Ok(Frame::Control)) => {}
            Some(Ok(Frame::Close)) | None => break,
            Some(Err(e)) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    cancel.cancel();
    engine.unregister(&code, &subscriber);
    writer.abort();

    info!(session = %code, conn_id = %conn_id, "WebSocket connection closed");
}
