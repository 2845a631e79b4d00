use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const BINDINGS: &[(&str, &str)] = &[
    ("j/k \u{2193}/\u{2191}", "move"),
    ("g/G", "first/last"),
    ("a", "add task"),
    ("e", "edit title"),
    ("space/x", "toggle done"),
    ("d", "delete (y/n to confirm)"),
    ("r", "refresh from server"),
    ("1/2/3", "filter all/active/done"),
    ("q", "quit"),
];

/// Render the key binding overlay, centered.
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let w = 44.min(area.width);
    let h = (BINDINGS.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    };

    frame.render_widget(Clear, popup);

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<12}", keys),
                    Style::default().fg(app.theme.highlight),
                ),
                Span::styled(*action, Style::default().fg(app.theme.text)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" help ")
        .style(Style::default().bg(app.theme.background).fg(app.theme.text));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
