//! Logging setup
//!
//! Console output by default, a daily rolling file when a log directory is
//! given. `RUST_LOG` overrides the level passed in.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger at `info`
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with an optional level, JSON output and log directory
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir.and_then(|dir| {
        let log_path = Path::new(dir);
        if !log_path.exists()
            && let Err(e) = std::fs::create_dir_all(log_path)
        {
            eprintln!("Failed to create log directory {dir}: {e}");
            return None;
        }
        Some(tracing_appender::rolling::daily(log_path, "lotus-client"))
    });

    // A second init (e.g. across tests) keeps the first subscriber
    let result = match (file_appender, json.unwrap_or(false)) {
        (Some(appender), true) => builder.json().with_writer(appender).try_init(),
        (Some(appender), false) => builder.with_ansi(false).with_writer(appender).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if result.is_ok() {
        tracing::debug!(level = %level, "Logger initialized");
    }
}
