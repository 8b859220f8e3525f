//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two sources:
//! - User interactions (keyboard, resize) from the driver.
//! - Results of actions the runtime executed (HTTP calls, the streaming
//!   connection).

use motbwa_client::Session;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// Login succeeded.
    LoginSucceeded(Session),

    /// Login or user creation failed.
    AuthFailed {
        /// Error shown on the form.
        message: String,
    },

    /// Streaming connection established.
    Connected,

    /// Message received on the streaming connection.
    MessageReceived {
        /// Sender username.
        sender: String,
        /// Message text.
        content: String,
    },

    /// Server closed the streaming connection normally.
    ConnectionClosed,

    /// Streaming connection failed or could not be established.
    ConnectionLost {
        /// Failure description.
        reason: String,
    },

    /// User lookup confirmed the contact exists.
    ContactVerified {
        /// Contact username.
        username: String,
    },

    /// User lookup failed.
    ContactRejected {
        /// Error shown on the form.
        message: String,
    },
}
