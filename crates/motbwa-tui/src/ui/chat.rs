//! Chat area
//!
//! Displays the transcript, newest messages at the bottom.

use motbwa_app::{App, LOCAL_SENDER};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.session() {
        Some(session) => format!(" {} ", session.username),
        None => " Chat ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = if app.transcript().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet. Ctrl-A adds a contact, Ctrl-C quits.",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.transcript()
            .iter()
            .map(|msg| {
                let color = if msg.sender == LOCAL_SENDER { Color::Cyan } else { Color::Green };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{}:", msg.sender),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::raw(msg.content.as_str()),
                ]))
            })
            .collect()
    };

    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}
