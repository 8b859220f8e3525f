//! Status bar
//!
//! Displays connection status, contact count and the last notice.

use motbwa_app::{App, ConnectionState};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection_status = match app.connection_state() {
        ConnectionState::Disconnected => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected => {
            let username = app.session().map_or("", |session| session.username.as_str());
            Span::styled(
                format!("Connected as {username}"),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
        },
        ConnectionState::Closed => {
            Span::styled("Connection closed by server", Style::default().fg(Color::Red))
        },
        ConnectionState::Lost { reason } => {
            Span::styled(format!("Connection lost: {reason}"), Style::default().fg(Color::Red))
        },
    };

    let mut info = format!(" | Contacts: {}", app.contacts().len());
    if let Some(message) = app.status_message() {
        info.push_str(" | ");
        info.push_str(message);
    }

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::styled(info, Style::default().fg(Color::Gray)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
