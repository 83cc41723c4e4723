use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::TextArea;

use crate::state::{Focus, StudioState};

#[derive(Debug, PartialEq, Eq)]
pub enum StudioAction {
    /// Start a conversion with the current form.
    Convert,
    /// Play the last generated file.
    Play,
    /// Stop playback.
    Stop,
    /// Load the file named in the load field into the text area.
    LoadFile,
    Quit,
    None,
}

pub fn handle_key_event(
    key: KeyEvent,
    textarea: &mut TextArea,
    state: &mut StudioState,
) -> StudioAction {
    // Dialogs are modal.
    if state.dialog.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.dismiss_dialog();
        }
        return StudioAction::None;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c') | KeyCode::Char('q'), m) if m.contains(KeyModifiers::CONTROL) => {
            StudioAction::Quit
        }

        (KeyCode::F(5), _) if state.convert_enabled => StudioAction::Convert,
        (KeyCode::F(6), _) if state.play_enabled => StudioAction::Play,
        (KeyCode::F(7), _) if state.stop_enabled => StudioAction::Stop,
        (KeyCode::F(5) | KeyCode::F(6) | KeyCode::F(7), _) => StudioAction::None,

        (KeyCode::F(2), _) => {
            state.toggle_key_visibility();
            StudioAction::None
        }

        (KeyCode::F(3), _) => {
            state.toggle_normalize();
            StudioAction::None
        }

        (KeyCode::Char('l'), m) if m.contains(KeyModifiers::CONTROL) => {
            *textarea = TextArea::default();
            configure_textarea(textarea);
            state.text_cleared();
            StudioAction::None
        }

        (KeyCode::Tab, _) => {
            state.focus = state.focus.next();
            StudioAction::None
        }

        (KeyCode::BackTab, _) => {
            state.focus = state.focus.prev();
            StudioAction::None
        }

        _ => handle_focused(key, textarea, state),
    }
}

fn handle_focused(key: KeyEvent, textarea: &mut TextArea, state: &mut StudioState) -> StudioAction {
    match state.focus {
        Focus::Text => {
            textarea.input(key);
            StudioAction::None
        }
        Focus::Voice | Focus::Model | Focus::Language => {
            match key.code {
                KeyCode::Left | KeyCode::Up => state.cycle_selection(false),
                KeyCode::Right | KeyCode::Down | KeyCode::Char(' ') => state.cycle_selection(true),
                _ => {}
            }
            StudioAction::None
        }
        Focus::LoadPath if key.code == KeyCode::Enter => StudioAction::LoadFile,
        Focus::ApiKey | Focus::LoadPath | Focus::Output => {
            let field = match state.focus {
                Focus::ApiKey => &mut state.api_key,
                Focus::LoadPath => &mut state.load_path,
                _ => &mut state.output_path,
            };
            edit_line(field, key);
            StudioAction::None
        }
    }
}

fn edit_line(field: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.push(c),
        KeyCode::Backspace => {
            field.pop();
        }
        KeyCode::Delete => field.clear(),
        _ => {}
    }
}

pub fn configure_textarea(textarea: &mut TextArea) {
    textarea.set_placeholder_text("Type or load the text to convert...");
    textarea.set_cursor_line_style(ratatui::style::Style::default());
    textarea.set_style(ratatui::style::Style::default().fg(ratatui::style::Color::White));
}
