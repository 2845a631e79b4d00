use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{SyncState, Task};
use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the task list with the cursor kept in view.
pub fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let tasks = app.visible_tasks();
    let has_input_row = app.mode == Mode::Insert;
    let list_height = (area.height as usize).saturating_sub(usize::from(has_input_row));

    // Keep the cursor row inside the viewport
    if list_height > 0 {
        if app.cursor < app.scroll_offset {
            app.scroll_offset = app.cursor;
        } else if app.cursor >= app.scroll_offset + list_height {
            app.scroll_offset = app.cursor + 1 - list_height;
        }
    }

    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    if has_input_row {
        lines.push(input_row(app, width));
    }

    if tasks.is_empty() {
        let hint = if app.is_loading() {
            "loading\u{2026}"
        } else if !has_input_row {
            "no tasks \u{2014} press a to add one"
        } else {
            ""
        };
        lines.push(Line::from(Span::styled(
            format!("  {}", hint),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        )));
    } else {
        for (i, task) in tasks
            .iter()
            .enumerate()
            .skip(app.scroll_offset)
            .take(list_height.max(1))
        {
            lines.push(task_row(app, task, i == app.cursor, width));
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// The `+ title▌` row shown while typing a new task.
fn input_row(app: &App, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let (before, after) = app.input.split();
    let mut spans = vec![
        Span::styled("  + ", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            before.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            after.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ];
    pad(&mut spans, width, Style::default().bg(bg));
    Line::from(spans)
}

fn task_row(app: &App, task: &Task, selected: bool, width: usize) -> Line<'static> {
    let theme = &app.theme;
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(bg);

    let pointer = if selected { "\u{25B8} " } else { "  " };
    let mut spans = vec![Span::styled(
        pointer.to_string(),
        base.fg(theme.highlight),
    )];

    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    let checkbox_style = if task.completed {
        base.fg(theme.done)
    } else {
        base.fg(theme.text)
    };
    spans.push(Span::styled(checkbox.to_string(), checkbox_style));

    let editing_here = app.mode == Mode::Edit && app.editing.as_ref() == Some(&task.id);
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let room = width.saturating_sub(used + suffix_width(task));

    if editing_here {
        let (before, after) = app.input.split();
        spans.push(Span::styled(
            before.to_string(),
            base.fg(theme.text_bright),
        ));
        spans.push(Span::styled("\u{258C}", base.fg(theme.highlight)));
        spans.push(Span::styled(after.to_string(), base.fg(theme.text_bright)));
    } else {
        let mut title_style = if task.completed {
            base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
        } else {
            base.fg(theme.text)
        };
        if task.id.is_local() {
            // placeholder awaiting the create response
            title_style = base.fg(theme.dim).add_modifier(Modifier::ITALIC);
        }
        spans.push(Span::styled(
            truncate_to_width(&task.title, room),
            title_style,
        ));
    }

    match task.sync {
        SyncState::Saving => {
            spans.push(Span::styled(" \u{2026}".to_string(), base.fg(theme.dim)));
        }
        SyncState::Reverted => {
            spans.push(Span::styled(" (restored)".to_string(), base.fg(theme.dim)));
        }
        SyncState::Clean => {}
    }

    pad(&mut spans, width, base);
    Line::from(spans)
}

fn suffix_width(task: &Task) -> usize {
    match task.sync {
        SyncState::Saving => 2,
        SyncState::Reverted => 11,
        SyncState::Clean => 0,
    }
}

fn pad(spans: &mut Vec<Span<'static>>, width: usize, style: Style) {
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}
