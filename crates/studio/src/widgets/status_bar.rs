use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::StudioState;

pub fn render_status(frame: &mut Frame, area: Rect, state: &StudioState) {
    let color = if state.convert_enabled {
        Color::Green
    } else {
        Color::Yellow
    };
    let bar = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(state.status.clone(), Style::default().fg(color)),
    ]))
    .style(Style::default().bg(Color::Rgb(30, 30, 30)));
    frame.render_widget(bar, area);
}

fn hint(key: &'static str, label: &'static str, enabled: bool) -> [Span<'static>; 2] {
    let (key_style, label_style) = if enabled {
        (
            Style::default().fg(Color::Black).bg(Color::Cyan),
            Style::default().fg(Color::White),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };
    [
        Span::styled(key, key_style),
        Span::styled(format!(" {label}  "), label_style),
    ]
}

pub fn render_hints(frame: &mut Frame, area: Rect, state: &StudioState) {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(hint("F5", "Convert", state.convert_enabled));
    spans.extend(hint("F6", "Play", state.play_enabled));
    spans.extend(hint("F7", "Stop", state.stop_enabled));
    spans.extend(hint("Tab", "Next field", true));
    spans.extend(hint("^L", "Clear", true));
    spans.extend(hint("^Q", "Quit", true));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
