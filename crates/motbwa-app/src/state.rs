//! Observable application state types.
//!
//! The view model the renderer reads: which screen is active, the contents of
//! each form, the transcript and the connection status.

use crate::TextInput;

/// Sender shown for messages typed locally.
pub const LOCAL_SENDER: &str = "You";

/// Longest username, in characters, accepted by the forms and the
/// add-contact field.
pub const USERNAME_MAX_LEN: usize = 32;

/// Longest chat message, in characters.
pub const MESSAGE_MAX_LEN: usize = 200;

/// Active screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Choose between logging in and signing up.
    InitChoice,
    /// Username/password login form.
    LoginForm,
    /// Username/password signup form.
    SignupForm,
    /// Transcript and message input.
    Chat,
    /// Add-contact form.
    AddContact,
}

/// Named screen transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Initial choice picked "Login".
    ChooseLogin,
    /// Initial choice picked "Sign up".
    ChooseSignup,
    /// Login finished; a session exists.
    Authenticated,
    /// Open the add-contact form from the chat.
    OpenAddContact,
    /// Contact verified and added.
    ContactAdded,
    /// Leave the add-contact form without adding.
    CancelAddContact,
}

impl Screen {
    /// Screen reached by `transition`, or `None` if the transition is not
    /// defined from this screen.
    pub fn next(self, transition: Transition) -> Option<Self> {
        match (self, transition) {
            (Self::InitChoice, Transition::ChooseLogin) => Some(Self::LoginForm),
            (Self::InitChoice, Transition::ChooseSignup) => Some(Self::SignupForm),
            (Self::LoginForm | Self::SignupForm, Transition::Authenticated) => Some(Self::Chat),
            (Self::Chat, Transition::OpenAddContact) => Some(Self::AddContact),
            (Self::AddContact, Transition::ContactAdded | Transition::CancelAddContact) => {
                Some(Self::Chat)
            },
            _ => None,
        }
    }
}

/// Streaming connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection attempted yet.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Connected; messages can be sent.
    Connected,
    /// Server closed the connection normally.
    Closed,
    /// Connection failed.
    Lost {
        /// Failure description.
        reason: String,
    },
}

/// Entries of the initial choice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Log in with an existing account.
    Login,
    /// Create an account.
    Signup,
}

impl MenuChoice {
    /// All entries in display order.
    pub const ALL: [Self; 2] = [Self::Login, Self::Signup];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign up",
        }
    }
}

/// Focusable field of a credentials form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Username field.
    Username,
    /// Password field, rendered masked.
    Password,
}

impl Field {
    /// The other field. Both directions cycle through the same two fields.
    pub fn toggle(self) -> Self {
        match self {
            Self::Username => Self::Password,
            Self::Password => Self::Username,
        }
    }
}

/// Login or signup form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsForm {
    /// Username field.
    pub username: TextInput,
    /// Password field.
    pub password: TextInput,
    /// Focused field.
    pub focus: Field,
    /// Inline error from the last submit. `None` if none.
    pub error: Option<String>,
}

impl Default for CredentialsForm {
    fn default() -> Self {
        Self {
            username: TextInput::with_limit(USERNAME_MAX_LEN),
            password: TextInput::new(),
            focus: Field::Username,
            error: None,
        }
    }
}

impl CredentialsForm {
    /// Focused input.
    pub fn focused_mut(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }
}

/// A transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Display name of the sender, [`LOCAL_SENDER`] for our own messages.
    pub sender: String,
    /// Message text.
    pub content: String,
}
