use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use tui_textarea::TextArea;

use crate::state::StudioState;
use crate::widgets::{dialog, form, status_bar};

pub fn draw_ui(frame: &mut Frame, state: &StudioState, textarea: &TextArea) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // API key
            Constraint::Min(5),    // Text
            Constraint::Length(3), // Load path
            Constraint::Length(3), // Voice / model / language
            Constraint::Length(3), // Output path
            Constraint::Length(1), // Status
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    form::render_api_key(frame, chunks[0], state);
    form::render_text(frame, chunks[1], state, textarea);
    form::render_load_path(frame, chunks[2], state);
    form::render_selectors(frame, chunks[3], state);
    form::render_output(frame, chunks[4], state);
    status_bar::render_status(frame, chunks[5], state);
    status_bar::render_hints(frame, chunks[6], state);

    if let Some(d) = &state.dialog {
        dialog::render(frame, d);
    }
}
