//! Event codec.
//!
//! Stateless conversion between [`Event`] envelopes and JSON text frames.
//! Encoding cannot fail for well-formed values, so an encode error indicates a
//! bug. Decoding untrusted frames fails routinely and callers are expected to
//! recover.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{Event, Message};

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Event could not be serialized.
    #[error("failed to encode event: {0}")]
    Encode(serde_json::Error),

    /// Frame is not a valid event envelope.
    #[error("failed to decode event: {0}")]
    Decode(serde_json::Error),
}

/// Encode a chat message from `sender` into a `send_message` frame.
pub fn encode(
    room: Uuid,
    sender: &str,
    text: &str,
    now: DateTime<Utc>,
) -> Result<String, CodecError> {
    encode_event(&Event::send_message(room, Message::new(sender, text, now)))
}

/// Encode an already-built event.
pub fn encode_event(event: &Event) -> Result<String, CodecError> {
    serde_json::to_string(event).map_err(CodecError::Encode)
}

/// Decode a frame payload into an event.
pub fn decode(bytes: &[u8]) -> Result<Event, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
