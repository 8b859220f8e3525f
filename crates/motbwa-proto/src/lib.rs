//! Wire protocol for motbwa chat
//!
//! Every frame on the streaming connection carries exactly one JSON
//! [`Event`] envelope. This crate holds the envelope types and the codec that
//! turns them into text frames and back.
//!
//! # Components
//!
//! - [`Event`]: Wire envelope (type tag, room id, message)
//! - [`Message`]: Chat message carried by an event
//! - [`Room`]: Chat room a connection is bound to
//! - [`encode`] / [`decode`]: Stateless codec between envelopes and frames

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codec;
mod event;

pub use codec::{CodecError, decode, encode, encode_event};
pub use event::{Event, Message, Room, SEND_MESSAGE};
