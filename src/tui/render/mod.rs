pub mod help_overlay;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::util::unicode::display_width;

use super::app::{App, Filter};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    list_view::render_list(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }
}

/// Title on the left, filter tabs on the right, separator underneath.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = vec![Span::styled(
        " tether",
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];

    let mut tabs: Vec<Span> = Vec::new();
    for (i, filter) in [Filter::All, Filter::Active, Filter::Done].iter().enumerate() {
        let style = if *filter == app.filter {
            Style::default().fg(app.theme.highlight).bg(bg)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        tabs.push(Span::styled(format!("{} {}", i + 1, filter.label()), style));
        tabs.push(Span::styled("  ", Style::default().bg(bg)));
    }

    let left_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let tabs_width: usize = tabs.iter().map(|s| display_width(&s.content)).sum();
    if left_width + tabs_width < width {
        spans.push(Span::styled(
            " ".repeat(width - left_width - tabs_width),
            Style::default().bg(bg),
        ));
    }
    spans.extend(tabs);

    let separator = Line::from(Span::styled(
        "\u{2500}".repeat(width),
        Style::default().fg(app.theme.dim).bg(bg),
    ));

    let header = Paragraph::new(vec![Line::from(spans), separator]);
    frame.render_widget(header, area);
}

#[cfg(test)]
mod tests {
    use super::test_helpers::{TERM_H, TERM_W, render_to_string, test_app};
    use super::*;
    use crate::tui::app::Mode;
    use crate::tui::input::EditBuffer;

    #[test]
    fn test_render_shows_tasks_and_tabs() {
        let mut app = test_app();
        let text = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(text.contains("tether"));
        assert!(text.contains("1 All"));
        assert!(text.contains("[ ] walk the dog"));
        assert!(text.contains("[x] water the plants"));
    }

    #[test]
    fn test_render_active_filter_hides_done() {
        let mut app = test_app();
        app.set_filter(Filter::Active);
        let text = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(text.contains("walk the dog"));
        assert!(!text.contains("water the plants"));
    }

    #[test]
    fn test_render_error_banner() {
        let mut app = test_app();
        app.state
            .borrow_mut()
            .fail("network error: connection refused".into());
        let text = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(text.contains("network error: connection refused"));
    }

    #[test]
    fn test_render_insert_mode_input_row() {
        let mut app = test_app();
        app.mode = Mode::Insert;
        app.input = EditBuffer::with_text("buy mi");
        let text = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(text.contains("buy mi"));
        assert!(text.contains("Enter add"));
    }

    #[test]
    fn test_render_confirm_prompt() {
        let mut app = test_app();
        let task = app.cursor_task().unwrap();
        app.pending_delete = Some(task.clone());
        app.mode = Mode::Confirm;
        let text = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(text.contains("delete"));
        assert!(text.contains(&task.title));
    }

    #[test]
    fn test_render_help_overlay() {
        let mut app = test_app();
        app.show_help = true;
        let text = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(text.contains("toggle"));
        assert!(text.contains("refresh"));
    }

    #[test]
    fn test_render_empty_list_hint() {
        let mut app = test_app();
        app.state.borrow_mut().replace_all(&[]);
        let text = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(text.contains("no tasks"));
    }
}
