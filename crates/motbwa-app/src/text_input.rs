//! Single-line text editing.
//!
//! Buffer plus cursor, shared by every text field in the view flow. The
//! cursor counts characters, not bytes, so multi-byte input never splits a
//! code point.

use crate::KeyInput;

/// Editable single-line text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    /// Text buffer.
    buffer: String,
    /// Cursor position in characters, `0..=len`.
    cursor: usize,
    /// Maximum length in characters. `None` if unbounded.
    limit: Option<usize>,
}

impl TextInput {
    /// Create an empty, unbounded input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty input holding at most `limit` characters.
    ///
    /// Characters typed once the input is full are dropped.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit), ..Self::default() }
    }

    /// Maximum length in characters, if any.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Current text.
    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// One `*` per character, for password fields.
    pub fn masked(&self) -> String {
        "*".repeat(self.len())
    }

    /// Take the text out, leaving the input empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Discard the text.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Apply an editing key.
    ///
    /// Returns `false` for keys that do not edit text (Enter, Tab, control
    /// chords, ...), leaving the input untouched so the caller can handle
    /// them. A character typed into a full input is dropped and also
    /// returns `false`.
    pub fn handle_key(&mut self, key: KeyInput) -> bool {
        match key {
            KeyInput::Char(_) if self.is_full() => return false,
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => {
                if self.cursor < self.len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
            },
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.len(),
            KeyInput::Ctrl(_)
            | KeyInput::Enter
            | KeyInput::Tab
            | KeyInput::BackTab
            | KeyInput::Esc
            | KeyInput::Up
            | KeyInput::Down => return false,
        }
        true
    }

    fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.len() >= limit)
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}
