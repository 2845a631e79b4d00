use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

use super::app::{App, Filter, Mode};

// ---------------------------------------------------------------------------
// Edit buffer
// ---------------------------------------------------------------------------

/// Single-line text buffer with a grapheme-aware cursor (byte offset).
#[derive(Debug, Clone, Default)]
pub struct EditBuffer {
    pub text: String,
    pub cursor: usize,
}

impl EditBuffer {
    pub fn with_text(text: &str) -> EditBuffer {
        EditBuffer {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Drain the buffer, leaving it empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// The text on either side of the cursor, for rendering.
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.cursor)
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }
}

// ---------------------------------------------------------------------------
// Key dispatch
// ---------------------------------------------------------------------------

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl-C quits from any mode
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Insert => handle_insert(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

fn handle_navigate(app: &mut App, key: KeyEvent) {
    if app.show_help {
        // any key closes the overlay
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.visible_tasks().len().saturating_sub(1);
        }

        KeyCode::Char('1') => app.set_filter(Filter::All),
        KeyCode::Char('2') => app.set_filter(Filter::Active),
        KeyCode::Char('3') => app.set_filter(Filter::Done),

        KeyCode::Char('r') => {
            let ctrl = app.ctrl.clone();
            app.spawn(async move { ctrl.refresh().await });
        }

        KeyCode::Char('a') => {
            if !app.is_loading() {
                app.input.clear();
                app.mode = Mode::Insert;
            }
        }

        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(task) = app.cursor_task() {
                let ctrl = app.ctrl.clone();
                app.spawn(async move { ctrl.toggle(&task.id).await });
            }
        }

        KeyCode::Char('e') => {
            // placeholders and in-flight rows are not editable
            if let Some(task) = app.cursor_task()
                && task.id.as_remote().is_some()
                && !task.sync.is_saving()
            {
                app.input = EditBuffer::with_text(&task.title);
                app.editing = Some(task.id);
                app.mode = Mode::Edit;
            }
        }

        KeyCode::Char('d') => {
            if let Some(task) = app.cursor_task()
                && task.id.as_remote().is_some()
                && !task.sync.is_saving()
            {
                app.pending_delete = Some(task);
                app.mode = Mode::Confirm;
            }
        }

        _ => {}
    }
}

fn handle_insert(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            let title = app.input.take();
            app.mode = Mode::Navigate;
            if !title.trim().is_empty() {
                // the new placeholder lands at the top
                app.cursor = 0;
                let ctrl = app.ctrl.clone();
                app.spawn(async move { ctrl.add(&title).await });
            }
        }
        _ => handle_text_key(app, key),
    }
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input.clear();
            app.editing = None;
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            // an empty title is rejected and edit mode stays open
            if app.input.text.trim().is_empty() {
                return;
            }
            let title = app.input.take();
            app.mode = Mode::Navigate;
            if let Some(id) = app.editing.take() {
                let ctrl = app.ctrl.clone();
                app.spawn(async move {
                    ctrl.edit(&id, &title).await;
                });
            }
        }
        _ => handle_text_key(app, key),
    }
}

fn handle_confirm(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') => {
            app.mode = Mode::Navigate;
            if let Some(task) = app.pending_delete.take() {
                let ctrl = app.ctrl.clone();
                app.spawn(async move { ctrl.delete(&task.id).await });
            }
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.pending_delete = None;
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}

/// Shared text editing keys for Insert and Edit modes.
fn handle_text_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.insert(c);
        }
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Left => app.input.left(),
        KeyCode::Right => app.input.right(),
        KeyCode::Home => app.input.home(),
        KeyCode::End => app.input.end(),
        _ => {}
    }
}
