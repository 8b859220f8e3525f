//! Application layer for motbwa
//!
//! Pure view-flow state machine plus a generic runtime that executes its
//! actions against the chat server, so the same orchestration runs in the
//! terminal and in tests.
//!
//! # Components
//!
//! - [`App`]: View-flow state machine (screens, forms, transcript, contacts)
//! - [`Driver`]: Trait for platform-specific terminal I/O
//! - [`Runtime`]: Event loop over input and the streaming connection
//! - [`TextInput`]: Single-line editing shared by every field

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod input;
mod runtime;
mod state;
mod text_input;

pub use action::AppAction;
pub use app::{
    App, DUPLICATE_CONTACT_ERROR, EMPTY_CONTACT_ERROR, NOT_CONNECTED_ERROR, SELF_CONTACT_ERROR,
};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::KeyInput;
pub use runtime::Runtime;
pub use state::{
    ChatMessage, ConnectionState, CredentialsForm, Field, LOCAL_SENDER, MESSAGE_MAX_LEN,
    MenuChoice, Screen, Transition, USERNAME_MAX_LEN,
};
pub use text_input::TextInput;
