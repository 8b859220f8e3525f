//! Login and signup forms

use motbwa_app::{CredentialsForm, Field};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use super::input;

const FORM_WIDTH: u16 = 60;
const FIELD_HEIGHT: u16 = 3;
const HINT: &str = "Tab to switch field, Enter to submit, Ctrl-C to quit";

/// Render a credentials form centered in `area`.
pub fn render(frame: &mut Frame, title: &str, form: &CredentialsForm, area: Rect) {
    // outer borders, two fields, error line, hint line
    let height = 2 + 2 * FIELD_HEIGHT + 2;
    let area = super::centered(area, FORM_WIDTH, height);

    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let [username_area, password_area, error_area, hint_area] = chunks.as_ref() else {
        return;
    };

    input::render_field(
        frame,
        " Username ",
        form.username.value(),
        form.username.cursor(),
        form.focus == Field::Username,
        *username_area,
    );
    input::render_field(
        frame,
        " Password ",
        &form.password.masked(),
        form.password.cursor(),
        form.focus == Field::Password,
        *password_area,
    );

    if let Some(error) = &form.error {
        let error = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(error, *error_area);
    }

    let hint = Paragraph::new(HINT).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, *hint_area);
}
