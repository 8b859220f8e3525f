//! Terminal client errors.

use std::{io, path::PathBuf};

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Errors from the terminal client.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Log file could not be opened.
    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        /// Configured log file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// A global tracing subscriber was already installed.
    #[error("logging already initialised: {0}")]
    Logging(#[from] TryInitError),
}
