//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The network stays in the
//! runtime.

use std::io::{Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use motbwa_app::{App, AppEvent, Driver, KeyInput};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{TuiError, ui};

/// Terminal driver implementing the [`Driver`] trait.
///
/// Puts the terminal in raw mode on the alternate screen for its lifetime;
/// dropping it restores the terminal.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
}

impl TerminalDriver {
    /// Take over the terminal.
    pub fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, event_stream: EventStream::new() })
    }
}

/// Convert a crossterm key event to [`KeyInput`].
///
/// Control chords become [`KeyInput::Ctrl`] with a lowercase character.
/// Returns `None` for keys the client does not use.
pub fn convert_key(key: KeyEvent) -> Option<KeyInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char(c) => Some(KeyInput::Ctrl(c.to_ascii_lowercase())),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::BackTab => Some(KeyInput::BackTab),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}

impl Driver for TerminalDriver {
    type Error = TuiError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        while let Some(event) = self.event_stream.next().await {
            match event? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(input) = convert_key(key) {
                        return Ok(Some(AppEvent::Key(input)));
                    }
                },
                Event::Resize(cols, rows) => return Ok(Some(AppEvent::Resize(cols, rows))),
                _ => {},
            }
        }
        Ok(None)
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn stop(&mut self) {
        if let Err(e) = self.terminal.show_cursor() {
            tracing::debug!(error = %e, "failed to show cursor");
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn plain_keys() {
        assert_eq!(
            convert_key(press(KeyCode::Char('x'), KeyModifiers::NONE)),
            Some(KeyInput::Char('x'))
        );
        assert_eq!(convert_key(press(KeyCode::Enter, KeyModifiers::NONE)), Some(KeyInput::Enter));
        assert_eq!(convert_key(press(KeyCode::Esc, KeyModifiers::NONE)), Some(KeyInput::Esc));
    }

    #[test]
    fn shifted_characters_stay_characters() {
        assert_eq!(
            convert_key(press(KeyCode::Char('X'), KeyModifiers::SHIFT)),
            Some(KeyInput::Char('X'))
        );
    }

    #[test]
    fn control_chords() {
        assert_eq!(
            convert_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyInput::Ctrl('c'))
        );
        assert_eq!(
            convert_key(press(KeyCode::Char('A'), KeyModifiers::CONTROL | KeyModifiers::SHIFT)),
            Some(KeyInput::Ctrl('a'))
        );
        assert_eq!(convert_key(press(KeyCode::Enter, KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn shift_tab_is_back_tab() {
        assert_eq!(
            convert_key(press(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(KeyInput::BackTab)
        );
    }

    #[test]
    fn unused_keys_are_dropped() {
        assert_eq!(convert_key(press(KeyCode::F(1), KeyModifiers::NONE)), None);
        assert_eq!(convert_key(press(KeyCode::PageUp, KeyModifiers::NONE)), None);
    }
}
