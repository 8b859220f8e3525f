//! Client error types.
//!
//! HTTP failures are recoverable and surfaced to the user inline. Connection
//! failures are reported once to the caller; the connection manager never
//! terminates the process on its own.

use reqwest::StatusCode;
use thiserror::Error;

use crate::ValidationError;

/// Errors from HTTP API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials rejected locally; no request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Username to look up was empty; no request was made.
    #[error("the username cannot be empty")]
    EmptyUsername,

    /// Request could not be sent or the response not read.
    #[error("request to {endpoint} failed: {source}")]
    Request {
        /// Endpoint URL
        endpoint: String,
        /// Underlying HTTP error
        source: reqwest::Error,
    },

    /// Server answered with an unexpected status.
    #[error("server responded with status {status} on endpoint {endpoint}")]
    Status {
        /// Endpoint URL
        endpoint: String,
        /// Status received
        status: StatusCode,
    },

    /// Response body did not have the expected shape.
    #[error("unexpected response from {endpoint}: {source}")]
    InvalidResponse {
        /// Endpoint URL
        endpoint: String,
        /// Decoding error
        source: reqwest::Error,
    },
}

/// Errors from the streaming connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// WebSocket handshake failed.
    #[error("websocket handshake with {url} failed: {reason}")]
    Handshake {
        /// Streaming endpoint
        url: String,
        /// Failure description
        reason: String,
    },

    /// The outbound pump has stopped; nothing more can be sent.
    #[error("connection closed")]
    Closed,

    /// A pump task panicked or was aborted.
    #[error("connection task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
