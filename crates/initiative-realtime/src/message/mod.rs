//! WebSocket message types, parsing, serialization, and validation.

pub mod fields;
pub mod serializer;
pub mod types;
pub mod validator;

pub use types::{InboundCommand, OutboundMessage, RawEnvelope};
