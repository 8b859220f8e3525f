//! Input line
//!
//! Displays a text buffer with cursor.

use motbwa_app::TextInput;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

const PROMPT_WIDTH: u16 = 3; // "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the chat input line, always focused.
pub fn render(frame: &mut Frame, title: &str, input: &TextInput, area: Rect) {
    render_field(frame, title, input.value(), input.cursor(), true, area);
}

/// Render a bordered one-line field showing `text`.
///
/// Only a focused field gets a highlighted border and the terminal cursor.
#[allow(clippy::cast_possible_truncation)]
pub fn render_field(
    frame: &mut Frame,
    title: &str,
    text: &str,
    cursor: usize,
    focused: bool,
    area: Rect,
) {
    let border_style =
        if focused { Style::default().fg(Color::Yellow) } else { Style::default() };
    let block = Block::default().borders(Borders::ALL).border_style(border_style).title(title);

    let input_text = format!("> {text}");
    let paragraph =
        Paragraph::new(input_text).style(Style::default().fg(Color::White)).block(block);

    frame.render_widget(paragraph, area);

    if !focused {
        return;
    }

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = (cursor.min(usize::from(u16::MAX)) as u16).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}
