//! Add-contact popup

use motbwa_app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::input;

const POPUP_WIDTH: u16 = 60;
const POPUP_HEIGHT: u16 = 7;
const HINT: &str = "Enter to add, Ctrl-B to go back";

/// Render the add-contact popup centered in `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let area = super::centered(area, POPUP_WIDTH, POPUP_HEIGHT);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Add contact ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let [field_area, error_area, hint_area] = chunks.as_ref() else {
        return;
    };

    let contact = app.contact_input();
    input::render_field(frame, " Username ", contact.value(), contact.cursor(), true, *field_area);

    if let Some(error) = app.contact_error() {
        let error = Paragraph::new(error).style(Style::default().fg(Color::Red));
        frame.render_widget(error, *error_area);
    }

    let hint = Paragraph::new(HINT).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, *hint_area);
}
