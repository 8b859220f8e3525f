//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.
//! Every action that performs I/O reports back through an [`crate::AppEvent`].

use motbwa_client::Session;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Log in.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },

    /// Create a user, then log in with the same credentials.
    CreateUser {
        /// Username, already validated.
        username: String,
        /// Password, already validated.
        password: String,
    },

    /// Open the streaming connection.
    Connect {
        /// Session authorizing the handshake.
        session: Session,
    },

    /// Send a chat message to the current room.
    SendMessage {
        /// Message text.
        content: String,
    },

    /// Check that a prospective contact exists.
    CheckContact {
        /// Contact username.
        username: String,
    },

    /// Close the streaming connection.
    Disconnect,
}
