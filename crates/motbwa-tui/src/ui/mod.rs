//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into the frame.

mod chat;
mod contact;
mod form;
mod input;
mod menu;
mod status;

use motbwa_app::{App, Screen};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
};

/// Render the entire UI for the active screen.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    match app.screen() {
        Screen::InitChoice => menu::render(frame, app, area),
        Screen::LoginForm => form::render(frame, " Login ", app.login_form(), area),
        Screen::SignupForm => form::render(frame, " Sign up ", app.signup_form(), area),
        Screen::Chat | Screen::AddContact => render_chat(frame, app),
    }
}

/// Transcript, input line and status bar, with the add-contact popup on top
/// while it is open.
fn render_chat(frame: &mut Frame, app: &App) {
    const TRANSCRIPT_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(TRANSCRIPT_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [transcript_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    chat::render(frame, app, *transcript_area);
    input::render(frame, " Message ", app.chat_input(), *input_area);
    status::render(frame, app, *status_area);

    if app.screen() == Screen::AddContact {
        let area = frame.area();
        contact::render(frame, app, area);
    }
}

/// Rectangle of at most `width` x `height` centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center).areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(row);
    cell
}
