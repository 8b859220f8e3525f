//! Driver trait for abstracting terminal I/O.
//!
//! The [`Driver`] trait decouples the runtime from a specific terminal
//! library. The TUI implements it with crossterm and ratatui; tests implement
//! it with scripted input and recorded frames.

use std::future::Future;

use crate::{App, AppEvent};

/// Abstracts user-facing I/O for the application runtime.
///
/// Network I/O is not part of the driver: the [`Runtime`](crate::Runtime)
/// owns the API client and the connection manager itself.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Returns `None` once input has ended, which stops the runtime. Must be
    /// cancel safe: the runtime races it against the connection.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release user-facing resources.
    fn stop(&mut self);
}
