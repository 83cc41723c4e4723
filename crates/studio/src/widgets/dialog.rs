use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::state::{Dialog, DialogKind};

/// Centers a `width` x `height` box inside `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render(frame: &mut Frame, dialog: &Dialog) {
    let color = match dialog.kind {
        DialogKind::Info => Color::Green,
        DialogKind::Warning => Color::Yellow,
        DialogKind::Error => Color::Red,
    };

    let mut lines: Vec<Line> = dialog.message.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::styled("[Enter] OK", Style::default().fg(Color::DarkGray)));

    let area = centered(frame.area(), 60, lines.len() as u16 + 4);
    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(dialog.title)
            .border_style(Style::default().fg(color)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}
