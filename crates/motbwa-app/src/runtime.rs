//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: view-flow state machine
//! - [`Driver`]: platform-specific terminal I/O
//! - [`ApiClient`] and [`ConnectionManager`]: the network
//!
//! One event is processed at a time. Actions that perform I/O are awaited
//! before the next input is read, so from the user's point of view login,
//! signup and the contact lookup are synchronous.

use motbwa_client::{ApiClient, ConnectionEvent, ConnectionManager, Session, WsTransport};

use crate::{App, AppAction, AppEvent, Driver};

/// What woke the event loop.
enum Step<E> {
    /// Terminal input, or `None` once input ended.
    Input(Result<Option<AppEvent>, E>),
    /// Inbound connection event, or `None` once both pumps stopped.
    Connection(Option<ConnectionEvent>),
}

/// Generic runtime that orchestrates App, Driver and the network.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
    api: ApiClient,
    connection: Option<ConnectionManager<WsTransport>>,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime on the initial choice screen.
    pub fn new(driver: D, api: ApiClient) -> Self {
        Self { driver, app: App::new(), api, connection: None }
    }

    /// Run the main event loop until the user quits or input ends.
    ///
    /// The connection is closed and the driver stopped on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let result = self.event_loop().await;

        self.disconnect().await;
        self.driver.stop();
        result
    }

    async fn event_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let step = tokio::select! {
                input = self.driver.poll_event() => Step::Input(input),
                event = next_connection_event(&mut self.connection) => Step::Connection(event),
            };

            let event = match step {
                Step::Input(input) => match input? {
                    Some(event) => event,
                    None => {
                        tracing::info!("input ended");
                        return Ok(());
                    },
                },
                Step::Connection(event) => self.handle_connection_event(event).await,
            };

            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                tracing::info!("quit requested");
                return Ok(());
            }
        }
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                let event = match action {
                    AppAction::Render => {
                        self.driver.render(&self.app)?;
                        None
                    },
                    AppAction::Quit => return Ok(true),
                    AppAction::Login { username, password } => {
                        Some(login(&self.api, &username, &password).await)
                    },
                    AppAction::CreateUser { username, password } => {
                        Some(create_user(&self.api, &username, &password).await)
                    },
                    AppAction::Connect { session } => Some(self.connect(&session).await),
                    AppAction::SendMessage { content } => self.send_message(content).await,
                    AppAction::CheckContact { username } => {
                        Some(check_contact(&self.api, self.app.session(), username).await)
                    },
                    AppAction::Disconnect => {
                        self.disconnect().await;
                        None
                    },
                };

                if let Some(event) = event {
                    pending_actions.extend(self.app.handle(event));
                }
            }
        }
        Ok(false)
    }

    /// Translate an inbound connection event, releasing the connection when
    /// it has ended.
    async fn handle_connection_event(&mut self, event: Option<ConnectionEvent>) -> AppEvent {
        match event {
            Some(ConnectionEvent::Message(message)) => {
                AppEvent::MessageReceived { sender: message.sender, content: message.content }
            },
            Some(ConnectionEvent::Closed) => {
                self.disconnect().await;
                AppEvent::ConnectionClosed
            },
            Some(ConnectionEvent::Lost { reason }) => {
                self.disconnect().await;
                AppEvent::ConnectionLost { reason }
            },
            None => {
                self.disconnect().await;
                AppEvent::ConnectionLost { reason: "connection ended".to_string() }
            },
        }
    }

    async fn connect(&mut self, session: &Session) -> AppEvent {
        self.disconnect().await;

        match motbwa_client::connect(self.api.server(), session).await {
            Ok(manager) => {
                self.connection = Some(manager);
                AppEvent::Connected
            },
            Err(e) => AppEvent::ConnectionLost { reason: e.to_string() },
        }
    }

    async fn send_message(&mut self, content: String) -> Option<AppEvent> {
        let Some(connection) = &self.connection else {
            tracing::warn!("send without a connection");
            return None;
        };

        match connection.send_message(content).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "send failed");
                Some(AppEvent::ConnectionLost { reason: e.to_string() })
            },
        }
    }

    /// Close the connection manager, if any.
    async fn disconnect(&mut self) {
        let Some(manager) = self.connection.take() else {
            return;
        };

        match manager.close().await {
            Ok(outcome) => tracing::debug!(?outcome, "connection manager stopped"),
            Err(e) => tracing::warn!(error = %e, "connection manager did not stop cleanly"),
        }
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }
}

async fn login(api: &ApiClient, username: &str, password: &str) -> AppEvent {
    match api.login(username, password).await {
        Ok(session) => AppEvent::LoginSucceeded(session),
        Err(e) => {
            tracing::warn!(username, error = %e, "login failed");
            AppEvent::AuthFailed { message: e.to_string() }
        },
    }
}

/// Create the user, then log in with the same credentials.
async fn create_user(api: &ApiClient, username: &str, password: &str) -> AppEvent {
    if let Err(e) = api.create_user(username, password).await {
        tracing::warn!(username, error = %e, "user creation failed");
        return AppEvent::AuthFailed { message: e.to_string() };
    }
    login(api, username, password).await
}

async fn check_contact(api: &ApiClient, session: Option<&Session>, username: String) -> AppEvent {
    let Some(session) = session else {
        return AppEvent::ContactRejected { message: "not logged in".to_string() };
    };

    match api.check_user_exists(session, &username).await {
        Ok(()) => AppEvent::ContactVerified { username },
        Err(e) => {
            tracing::info!(%username, error = %e, "contact lookup failed");
            AppEvent::ContactRejected { message: e.to_string() }
        },
    }
}

/// Next inbound event, or pending forever without a connection.
async fn next_connection_event(
    connection: &mut Option<ConnectionManager<WsTransport>>,
) -> Option<ConnectionEvent> {
    match connection {
        Some(connection) => connection.recv().await,
        None => std::future::pending().await,
    }
}
