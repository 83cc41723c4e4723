use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use crate::state::{Focus, StudioState};

const MASK: char = '•';

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color))
}

fn line_field(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let mut spans = vec![Span::raw(value.to_owned())];
    if focused {
        spans.push(Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)));
    }
    let paragraph = Paragraph::new(Line::from(spans)).block(field_block(title, focused));
    frame.render_widget(paragraph, area);
}

pub fn masked(key: &str, show: bool) -> String {
    if show {
        key.to_owned()
    } else {
        MASK.to_string().repeat(key.chars().count())
    }
}

pub fn render_api_key(frame: &mut Frame, area: Rect, state: &StudioState) {
    let title = if state.show_key {
        "OpenAI API key (F2 to hide)"
    } else {
        "OpenAI API key (F2 to show)"
    };
    line_field(
        frame,
        area,
        title,
        &masked(&state.api_key, state.show_key),
        state.focus == Focus::ApiKey,
    );
}

pub fn render_text(frame: &mut Frame, area: Rect, state: &StudioState, textarea: &TextArea) {
    let title = if state.normalize {
        "Text [NFC on, F3]"
    } else {
        "Text [NFC off, F3]"
    };
    let block = field_block(title, state.focus == Focus::Text);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(textarea, inner);
}

pub fn render_load_path(frame: &mut Frame, area: Rect, state: &StudioState) {
    line_field(
        frame,
        area,
        "Load text file (Enter to load)",
        &state.load_path,
        state.focus == Focus::LoadPath,
    );
}

fn selector(frame: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let line = Line::from(vec![
        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
        Span::styled(value.to_owned(), style),
        Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line).block(field_block(title, focused)), area);
}

pub fn render_selectors(frame: &mut Frame, area: Rect, state: &StudioState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    selector(frame, cols[0], "Voice", state.voice().as_str(), state.focus == Focus::Voice);
    selector(frame, cols[1], "Model", state.model(), state.focus == Focus::Model);
    selector(
        frame,
        cols[2],
        "Language",
        state.language_name(),
        state.focus == Focus::Language,
    );
}

pub fn render_output(frame: &mut Frame, area: Rect, state: &StudioState) {
    line_field(
        frame,
        area,
        "Output file (blank for automatic name)",
        &state.output_path,
        state.focus == Focus::Output,
    );
}
