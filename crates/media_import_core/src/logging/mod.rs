//! Logging setup on top of the `tracing` ecosystem.
//!
//! Library code only emits `tracing` events. Binaries pick a subscriber:
//! - [`init_tracing`]: stderr only
//! - [`init_tracing_with_file`]: stderr plus a daily-rolling log file
//!
//! `RUST_LOG` overrides the configured level in both cases.

mod types;

pub use types::LogLevel;

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Base name of the rolling log file.
pub const LOG_FILE_NAME: &str = "media-import.log";

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()))
}

/// Initialize global tracing subscriber writing to stderr.
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter(default_level))
        .init();
}

/// Initialize tracing to stderr and to `<logs_dir>/media-import.log.<date>`.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the life of the program. Falls back to stderr only and returns `None`
/// when the directory cannot be created.
pub fn init_tracing_with_file(default_level: LogLevel, logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = fs::create_dir_all(logs_dir) {
        init_tracing(default_level);
        tracing::warn!(
            "Could not create logs directory '{}': {}. Logging to stderr only.",
            logs_dir.display(),
            e
        );
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter(default_level))
        .init();

    Some(guard)
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
