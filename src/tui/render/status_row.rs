use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Confirm => {
            let title = app
                .pending_delete
                .as_ref()
                .map(|t| t.title.clone())
                .unwrap_or_default();
            prompt_line(
                app,
                width,
                format!("delete \"{}\"?", truncate_to_width(&title, width / 2)),
                "y delete  n cancel",
            )
        }
        Mode::Insert => prompt_line(app, width, String::new(), "Enter add  Esc cancel"),
        Mode::Edit => prompt_line(app, width, String::new(), "Enter save  Esc cancel"),
        Mode::Navigate => {
            let state = app.state.borrow();
            if let Some(error) = state.error() {
                // single persistent banner until the next operation starts
                Line::from(Span::styled(
                    format!(" {}", truncate_to_width(error, width.saturating_sub(1))),
                    Style::default()
                        .fg(app.theme.error)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                let total = state.tasks().len();
                let done = state.tasks().iter().filter(|t| t.completed).count();
                let mut left = format!(" {} tasks \u{00B7} {} done", total, done);
                if state.is_loading() {
                    left = " loading\u{2026}".to_string();
                } else if state.saving_count() > 0 {
                    left.push_str(" \u{00B7} saving\u{2026}");
                } else if let Some(at) = state.last_refreshed() {
                    left.push_str(&format!(
                        " \u{00B7} refreshed {}",
                        at.format("%H:%M:%S")
                    ));
                }

                let hint = "a add  e edit  x toggle  d delete  r refresh  ? help";
                let mut spans = vec![Span::styled(
                    left.clone(),
                    Style::default().fg(app.theme.dim).bg(bg),
                )];
                let left_width = display_width(&left);
                let hint_width = display_width(hint);
                if left_width + hint_width < width {
                    spans.push(Span::styled(
                        " ".repeat(width - left_width - hint_width),
                        Style::default().bg(bg),
                    ));
                    spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
                }
                Line::from(spans)
            }
        }
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn prompt_line(app: &App, width: usize, prompt: String, hint: &'static str) -> Line<'static> {
    let bg = app.theme.background;
    let mut spans = vec![Span::styled(
        format!(" {}", prompt),
        Style::default().fg(app.theme.text_bright).bg(bg),
    )];
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if used + hint_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - hint_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }
    Line::from(spans)
}
