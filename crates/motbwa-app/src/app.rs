//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns the view flow of
//! the client completely decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Tracks the active [`Screen`] and moves between screens only through
//!   [`Screen::next`].
//! - Owns every form's input and inline error.
//! - Runs local validation (credential length, contact checks) so rejected
//!   input never produces an external call.
//! - Holds the session, the transcript and the contact set.

use std::collections::BTreeSet;

use motbwa_client::{Session, validate_credentials};

use crate::{
    AppAction, AppEvent, ChatMessage, ConnectionState, CredentialsForm, Field, KeyInput,
    LOCAL_SENDER, MESSAGE_MAX_LEN, MenuChoice, Screen, TextInput, Transition, USERNAME_MAX_LEN,
};

/// Shown when adding an empty contact name.
pub const EMPTY_CONTACT_ERROR: &str = "the username cannot be empty";
/// Shown when adding ourselves as a contact.
pub const SELF_CONTACT_ERROR: &str = "Cannot add yourself to your contact list";
/// Shown when adding a contact twice.
pub const DUPLICATE_CONTACT_ERROR: &str = "User already in contact list";
/// Shown when sending without a live connection.
pub const NOT_CONNECTED_ERROR: &str = "not connected";

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies.
#[derive(Debug, Clone)]
pub struct App {
    /// Active screen.
    screen: Screen,
    /// Selected index into [`MenuChoice::ALL`].
    menu_selected: usize,
    /// Login form state.
    login: CredentialsForm,
    /// Signup form state.
    signup: CredentialsForm,
    /// Chat message input.
    chat_input: TextInput,
    /// Add-contact input.
    contact_input: TextInput,
    /// Inline error of the add-contact form. `None` if none.
    contact_error: Option<String>,
    /// Contacts added this run.
    contacts: BTreeSet<String>,
    /// Messages in receipt order.
    transcript: Vec<ChatMessage>,
    /// Session of the logged-in user. `None` before login.
    session: Option<Session>,
    /// Streaming connection state.
    connection: ConnectionState,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create an App on the initial choice screen.
    pub fn new() -> Self {
        Self {
            screen: Screen::InitChoice,
            menu_selected: 0,
            login: CredentialsForm::default(),
            signup: CredentialsForm::default(),
            chat_input: TextInput::with_limit(MESSAGE_MAX_LEN),
            contact_input: TextInput::with_limit(USERNAME_MAX_LEN),
            contact_error: None,
            contacts: BTreeSet::new(),
            transcript: Vec::new(),
            session: None,
            connection: ConnectionState::Disconnected,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::LoginSucceeded(session) => self.authenticated(session),
            AppEvent::AuthFailed { message } => {
                match self.screen {
                    Screen::LoginForm => self.login.error = Some(message),
                    Screen::SignupForm => self.signup.error = Some(message),
                    _ => tracing::warn!(screen = ?self.screen, "auth failure outside a form"),
                }
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                self.connection = ConnectionState::Connected;
                self.status_message = None;
                vec![AppAction::Render]
            },
            AppEvent::MessageReceived { sender, content } => {
                self.transcript.push(ChatMessage { sender, content });
                vec![AppAction::Render]
            },
            AppEvent::ConnectionClosed => {
                self.connection = ConnectionState::Closed;
                vec![AppAction::Render]
            },
            AppEvent::ConnectionLost { reason } => {
                self.connection = ConnectionState::Lost { reason };
                vec![AppAction::Render]
            },
            AppEvent::ContactVerified { username } => {
                if self.transition(Transition::ContactAdded) {
                    self.status_message = Some(format!("Added {username} to your contacts"));
                    self.contacts.insert(username);
                    self.contact_input.clear();
                    self.contact_error = None;
                }
                vec![AppAction::Render]
            },
            AppEvent::ContactRejected { message } => {
                if self.screen == Screen::AddContact {
                    self.contact_error = Some(message);
                }
                vec![AppAction::Render]
            },
        }
    }

    /// Apply `transition` if it is defined from the current screen.
    ///
    /// Returns whether the screen changed.
    fn transition(&mut self, transition: Transition) -> bool {
        match self.screen.next(transition) {
            Some(next) => {
                tracing::debug!(from = ?self.screen, to = ?next, "screen transition");
                self.screen = next;
                true
            },
            None => {
                tracing::warn!(screen = ?self.screen, ?transition, "undefined transition");
                false
            },
        }
    }

    fn authenticated(&mut self, session: Session) -> Vec<AppAction> {
        if !self.transition(Transition::Authenticated) {
            return vec![];
        }

        tracing::info!(username = %session.username, "authenticated");
        self.login.password.clear();
        self.signup.password.clear();
        self.connection = ConnectionState::Connecting;
        self.status_message = None;
        self.session = Some(session.clone());
        vec![AppAction::Connect { session }, AppAction::Render]
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match self.screen {
            Screen::InitChoice => self.handle_menu_key(key),
            Screen::LoginForm | Screen::SignupForm => self.handle_form_key(key),
            Screen::Chat => self.handle_chat_key(key),
            Screen::AddContact => self.handle_contact_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Up => {
                self.menu_selected = self.menu_selected.saturating_sub(1);
                vec![AppAction::Render]
            },
            KeyInput::Down => {
                let last = MenuChoice::ALL.len().saturating_sub(1);
                self.menu_selected = self.menu_selected.saturating_add(1).min(last);
                vec![AppAction::Render]
            },
            KeyInput::Enter => {
                let transition = match self.menu_choice() {
                    MenuChoice::Login => Transition::ChooseLogin,
                    MenuChoice::Signup => Transition::ChooseSignup,
                };
                self.transition(transition);
                vec![AppAction::Render]
            },
            KeyInput::Ctrl('c') | KeyInput::Esc => vec![AppAction::Quit],
            _ => vec![],
        }
    }

    fn handle_form_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        let signup = self.screen == Screen::SignupForm;
        let form = if signup { &mut self.signup } else { &mut self.login };

        match key {
            KeyInput::Ctrl('c') => vec![AppAction::Quit],
            KeyInput::Tab | KeyInput::BackTab | KeyInput::Up | KeyInput::Down => {
                form.focus = form.focus.toggle();
                vec![AppAction::Render]
            },
            KeyInput::Enter if form.focus == Field::Username => {
                form.focus = Field::Password;
                vec![AppAction::Render]
            },
            KeyInput::Enter => {
                let username = form.username.value().to_string();
                let password = form.password.value().to_string();

                if !signup {
                    form.error = None;
                    return vec![AppAction::Login { username, password }, AppAction::Render];
                }

                match validate_credentials(&username, &password) {
                    Ok(()) => {
                        form.error = None;
                        vec![AppAction::CreateUser { username, password }, AppAction::Render]
                    },
                    Err(e) => {
                        form.error = Some(e.to_string());
                        vec![AppAction::Render]
                    },
                }
            },
            key => {
                if form.focused_mut().handle_key(key) {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
        }
    }

    fn handle_chat_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Ctrl('c') => vec![AppAction::Disconnect, AppAction::Quit],
            KeyInput::Ctrl('a') => {
                self.transition(Transition::OpenAddContact);
                vec![AppAction::Render]
            },
            KeyInput::Enter => self.submit_message(),
            key => {
                if self.chat_input.handle_key(key) {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
        }
    }

    fn submit_message(&mut self) -> Vec<AppAction> {
        if self.chat_input.is_empty() {
            return vec![];
        }

        if self.connection != ConnectionState::Connected {
            self.status_message = Some(NOT_CONNECTED_ERROR.to_string());
            return vec![AppAction::Render];
        }

        let content = self.chat_input.take();
        self.status_message = None;
        self.transcript
            .push(ChatMessage { sender: LOCAL_SENDER.to_string(), content: content.clone() });
        vec![AppAction::SendMessage { content }, AppAction::Render]
    }

    fn handle_contact_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Ctrl('c') => vec![AppAction::Disconnect, AppAction::Quit],
            KeyInput::Ctrl('b') => {
                self.contact_input.clear();
                self.contact_error = None;
                self.transition(Transition::CancelAddContact);
                vec![AppAction::Render]
            },
            KeyInput::Enter => match self.check_contact() {
                Ok(username) => {
                    self.contact_error = None;
                    vec![AppAction::CheckContact { username }, AppAction::Render]
                },
                Err(message) => {
                    self.contact_error = Some(message.to_string());
                    vec![AppAction::Render]
                },
            },
            key => {
                if self.contact_input.handle_key(key) {
                    vec![AppAction::Render]
                } else {
                    vec![]
                }
            },
        }
    }

    /// Local checks on the add-contact input, in order: empty, self, duplicate.
    fn check_contact(&self) -> Result<String, &'static str> {
        let username = self.contact_input.value();
        if username.is_empty() {
            return Err(EMPTY_CONTACT_ERROR);
        }
        if self.session.as_ref().is_some_and(|s| s.username == username) {
            return Err(SELF_CONTACT_ERROR);
        }
        if self.contacts.contains(username) {
            return Err(DUPLICATE_CONTACT_ERROR);
        }
        Ok(username.to_string())
    }

    /// Active screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Selected entry of the initial choice list.
    pub fn menu_choice(&self) -> MenuChoice {
        MenuChoice::ALL.get(self.menu_selected).copied().unwrap_or(MenuChoice::Login)
    }

    /// Login form.
    pub fn login_form(&self) -> &CredentialsForm {
        &self.login
    }

    /// Signup form.
    pub fn signup_form(&self) -> &CredentialsForm {
        &self.signup
    }

    /// Chat message input.
    pub fn chat_input(&self) -> &TextInput {
        &self.chat_input
    }

    /// Add-contact input.
    pub fn contact_input(&self) -> &TextInput {
        &self.contact_input
    }

    /// Inline error of the add-contact form. `None` if none.
    pub fn contact_error(&self) -> Option<&str> {
        self.contact_error.as_deref()
    }

    /// Contacts added this run, sorted.
    pub fn contacts(&self) -> &BTreeSet<String> {
        &self.contacts
    }

    /// Messages in receipt order.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Session of the logged-in user. `None` before login.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Streaming connection state.
    pub fn connection_state(&self) -> &ConnectionState {
        &self.connection
    }

    /// Terminal dimensions (columns, rows).
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
