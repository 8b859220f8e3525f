//! Client
//!
//! Everything the chat client needs to talk to the server: the session
//! obtained from logging in, the HTTP API calls, and the
//! [`ConnectionManager`] that owns the streaming connection.
//!
//! # Components
//!
//! - [`Session`]: Credentials produced by login, read-only afterwards
//! - [`ServerConfig`]: Server endpoints derived from host and port
//! - [`ApiClient`]: Login, user creation and user lookup over HTTP
//! - [`ConnectionManager`]: Duplex WebSocket connection with inbound and
//!   outbound pumps
//! - [`validate_credentials`]: Local checks run before creating a user

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod connection;
mod error;
mod session;
mod validation;

pub use api::ApiClient;
pub use connection::{
    CloseOutcome, ConnectionEvent, ConnectionManager, Transport, WsTransport, connect,
};
pub use error::{ApiError, ConnectionError};
pub use motbwa_proto::{Message, Room};
pub use session::{
    AUTH_HEADER, REFRESH_TOKEN_HEADER, ServerConfig, Session, UserInfo,
};
pub use validation::{MIN_CREDENTIAL_LEN, ValidationError, validate_credentials};
