use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use serde_json::json;

use crate::net::ApiClient;
use crate::ops::Controller;
use crate::tui::app::App;
use crate::tui::theme::Theme;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An app over a small canned list. The client points at a closed port;
/// render tests never touch the network.
pub fn test_app() -> App {
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let ctrl = Controller::new(client);
    let app = App::new(ctrl, Theme::default());
    app.state.borrow_mut().replace_all(&[
        json!({"id": "t1", "title": "walk the dog", "completed": false}),
        json!({"id": "t2", "title": "water the plants", "completed": true}),
        json!({"id": "t3", "title": "file the expenses", "completed": false}),
    ]);
    app
}
