//! Wire envelope types.
//!
//! An [`Event`] is one-to-one with a transport frame. Events are constructed
//! fresh for each send and parsed fresh for each receive; nothing here holds
//! state across frames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type tag for chat message events. The only type the client ever sends.
pub const SEND_MESSAGE: &str = "send_message";

/// Name given to the room every connection starts in.
const DEFAULT_ROOM_NAME: &str = "default";

/// Event envelope exchanged over the streaming connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Type tag. Currently only [`SEND_MESSAGE`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Room the message belongs to.
    pub room: Uuid,
    /// Message payload.
    pub message: Message,
}

impl Event {
    /// Build a `send_message` event for the given room.
    pub fn send_message(room: Uuid, message: Message) -> Self {
        Self { kind: SEND_MESSAGE.to_string(), room, message }
    }

    /// Whether this event carries a chat message.
    pub fn is_send_message(&self) -> bool {
        self.kind == SEND_MESSAGE
    }
}

/// A chat message.
///
/// Timestamps travel as RFC 3339 strings under the `date` key. Any offset is
/// accepted on input and normalised to UTC; a missing `date` decodes as the
/// Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the sender.
    pub sender: String,
    /// Message text.
    pub content: String,
    /// When the sender produced the message.
    #[serde(rename = "date", default)]
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Create a message.
    pub fn new(
        sender: impl Into<String>,
        content: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self { sender: sender.into(), content: content.into(), sent_at }
    }
}

/// A chat room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Room {
    /// Room identifier sent in every event.
    pub id: Uuid,
    /// Human-readable room name.
    pub name: String,
}

impl Room {
    /// Create a room with a fresh random identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), name: name.into() }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_NAME)
    }
}
