use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::Config;
use crate::model::{Task, TaskId};
use crate::net::ApiClient;
use crate::ops::{Controller, ListState};

use super::input::{self, EditBuffer};
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task title into the input row.
    Insert,
    /// Retitling the task under the cursor inline.
    Edit,
    /// Awaiting y/n for a delete.
    Confirm,
}

/// Client-side view filter (never sent to the server)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Active,
    Done,
}

impl Filter {
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Done => "Done",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Done => task.completed,
        }
    }
}

/// Main application state
///
/// The task list itself lives in the controller's [`ListState`]; the app
/// only holds view state (cursor, mode, input buffer) and never mutates
/// the list directly.
pub struct App {
    pub ctrl: Controller,
    pub state: Rc<RefCell<ListState>>,
    pub mode: Mode,
    pub filter: Filter,
    /// Cursor index into the filtered visible list
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    /// Shared text buffer for Insert and Edit modes
    pub input: EditBuffer,
    /// Edit mode: the task being retitled
    pub editing: Option<TaskId>,
    /// Confirm mode: the task queued for deletion
    pub pending_delete: Option<Task>,
    pub show_help: bool,
    pub should_quit: bool,
    pub theme: Theme,
}

impl App {
    pub fn new(ctrl: Controller, theme: Theme) -> App {
        let state = ctrl.state();
        App {
            ctrl,
            state,
            mode: Mode::Navigate,
            filter: Filter::All,
            cursor: 0,
            scroll_offset: 0,
            input: EditBuffer::default(),
            editing: None,
            pending_delete: None,
            show_help: false,
            should_quit: false,
            theme,
        }
    }

    /// Snapshot of the tasks the current filter shows, in list order.
    pub fn visible_tasks(&self) -> Vec<Task> {
        self.state
            .borrow()
            .tasks()
            .iter()
            .filter(|t| self.filter.matches(t))
            .cloned()
            .collect()
    }

    pub fn cursor_task(&self) -> Option<Task> {
        self.visible_tasks().get(self.cursor).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.clamp_cursor();
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let cur = self.cursor as isize + delta;
        self.cursor = cur.clamp(0, len as isize - 1) as usize;
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_tasks().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Run a controller operation in the background of the event loop.
    pub fn spawn(&self, fut: impl Future<Output = ()> + 'static) {
        tokio::task::spawn_local(fut);
    }
}

/// Run the TUI application
pub fn run(config: &Config, url_override: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = config.base_url(url_override);
    let client = ApiClient::new(&base_url, Duration::from_secs(config.server.timeout_secs))?;
    let ctrl = Controller::new(client);
    let theme = Theme::from_config(&config.ui);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();

    local.block_on(&runtime, async move {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Install panic hook to restore terminal on panic
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let mut app = App::new(ctrl, theme);

        // Startup fetch; the loading flag gates mutating keys until it settles
        let ctrl = app.ctrl.clone();
        app.spawn(async move { ctrl.initial_load().await });

        let result = run_event_loop(&mut terminal, &mut app).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    })
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = EventStream::new();
    // Periodic redraw so completions of in-flight operations show up
    let mut tick = tokio::time::interval(Duration::from_millis(150));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        input::handle_key(app, key);
                    }
                    Some(Ok(_)) => {} // resize etc., redrawn next pass
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            _ = tick.tick() => {}
        }

        app.clamp_cursor();
        if app.should_quit {
            break;
        }
    }
    Ok(())
}
