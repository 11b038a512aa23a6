//! WebSocket upgrade handler.

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};

use initiative_core::types::{SessionCode, SubscriberId};
use initiative_realtime::{Frame, Payload, run_connection};

use crate::error::ApiError;
use crate::extractors::Identity;
use crate::state::AppState;

/// GET /ws/{code}: WebSocket upgrade into a live session.
///
/// Unknown sessions get a 404 before any upgrade happens.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    identity: Identity,
    Path(code): Path<String>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let session = state.resolve_session(&code)?;
    let code = session.code().clone();

    let ws = match ws {
        Ok(ws) => {
            let limit = state.realtime.config().transport_frame_limit();
            ws.max_message_size(limit).max_frame_size(limit)
        }
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let uid = identity.uid;
    let upgrade = ws.on_upgrade(move |socket| handle_ws_connection(state, code, uid, socket));
    Ok((identity.jar, upgrade).into_response())
}

/// Runs an established WebSocket through the realtime connection driver.
async fn handle_ws_connection(
    state: AppState,
    code: SessionCode,
    uid: SubscriberId,
    socket: WebSocket,
) {
    let (ws_tx, ws_rx) = socket.split();

    let sink = ws_tx.with(|payload: Payload| async move {
        Ok::<_, axum::Error>(Message::Text(payload.as_ref().into()))
    });

    let stream = ws_rx.map(|message| {
        message.map(|message| match message {
            Message::Text(text) => Frame::Data(text.as_str().to_owned()),
            Message::Binary(bytes) => Frame::Binary(bytes.to_vec()),
            Message::Close(_) => Frame::Close,
            Message::Ping(_) | Message::Pong(_) => Frame::Control,
        })
    });

    run_connection(
        state.realtime.clone(),
        code,
        uid,
        Box::pin(sink),
        stream,
    )
    .await;
}
