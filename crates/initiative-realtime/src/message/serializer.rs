//! JSON (de)serialization for WebSocket frames.

use initiative_entity::SessionView;

use super::types::{InboundCommand, OutboundMessage, RawEnvelope};
use crate::connection::handle::Payload;

/// Parse a text frame into a typed command.
pub fn deserialize_inbound(text: &str) -> Result<InboundCommand, serde_json::Error> {
    let envelope: RawEnvelope = serde_json::from_str(text)?;
    Ok(InboundCommand::from_envelope(envelope))
}

/// Serialize an outbound message.
pub fn serialize_outbound(msg: &OutboundMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

/// Serialize a state view into a shareable payload.
pub fn state_payload(view: SessionView) -> Result<Payload, serde_json::Error> {
    serialize_outbound(&OutboundMessage::State(view)).map(Payload::from)
}
