use std::fs::File;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Environment variable naming a log file for TUI sessions.
pub const ENV_LOG_FILE: &str = "TETHER_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// CLI mode: log to stderr, level from `RUST_LOG` (default `warn`).
pub fn init_cli() {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .init();
}

/// TUI mode: stderr would corrupt the alternate screen, so logging is off
/// unless `TETHER_LOG` names a file to append to.
pub fn init_tui() {
    let Ok(path) = std::env::var(ENV_LOG_FILE) else {
        return;
    };
    let Ok(file) = File::options().create(true).append(true).open(&path) else {
        eprintln!("warning: could not open log file {path}");
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
}
