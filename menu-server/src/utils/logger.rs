//! Logging Infrastructure
//!
//! Structured logging via `tracing`. Stdout by default, a daily rolling file
//! when a log directory is given.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor a level is supplied
pub const DEFAULT_FILTER: &str = "menu_server=info,tower_http=info";

/// Initialize the logger from `RUST_LOG` / `LOG_LEVEL` / `LOG_DIR`
pub fn init_logger() {
    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(level.as_deref(), log_dir.as_deref());
}

/// Build the filter: `RUST_LOG` wins, then an explicit level, then the default.
pub fn build_filter(log_level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match log_level {
        Some(level) => EnvFilter::try_new(format!("menu_server={level},tower_http={level}"))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Initialize the logger with optional file output
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, "menu-server");
            // Files get no color escapes
            if subscriber
                .with_ansi(false)
                .with_writer(file_appender)
                .try_init()
                .is_err()
            {
                eprintln!("Logger already initialized");
            }
            return;
        }
        eprintln!("LOG_DIR {dir} does not exist, logging to stdout");
    }

    if subscriber.try_init().is_err() {
        eprintln!("Logger already initialized");
    }
}
