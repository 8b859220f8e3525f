//! Initial choice list

use motbwa_app::{App, MenuChoice};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem},
};

const MENU_WIDTH: u16 = 40;
const HINT: &str = "Up/Down to choose, Enter to confirm";

/// Render the login/signup choice centered in `area`.
#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // borders, entries, blank line, hint
    let height = MenuChoice::ALL.len() as u16 + 4;
    let area = super::centered(area, MENU_WIDTH, height);

    let mut items: Vec<ListItem> = MenuChoice::ALL
        .iter()
        .map(|&choice| {
            if choice == app.menu_choice() {
                ListItem::new(format!("> {}", choice.label()))
                    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(format!("  {}", choice.label()))
            }
        })
        .collect();
    items.push(ListItem::new(""));
    items.push(ListItem::new(Line::styled(HINT, Style::default().fg(Color::DarkGray))));

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" motbwa "));

    frame.render_widget(list, area);
}
