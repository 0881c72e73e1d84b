//! Console and rotating-file logging.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Prefix of the log files written under the log directory.
pub const LOG_FILE_PREFIX: &str = "service";

/// Number of rotated log files kept on disk.
const MAX_LOG_FILES: usize = 30;

/// Non-blocking writer for a daily-rotated JSON log file in `log_dir`.
///
/// The returned guard flushes buffered lines when dropped and must be kept
/// alive for as long as logging is needed.
pub fn file_writer(log_dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .context("failed to create rolling log file")?;

    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber: human-readable lines on stdout and JSON
/// lines in the rotating file. `RUST_LOG` overrides the default `info` level.
pub fn init_logging(log_dir: &Path) -> Result<WorkerGuard> {
    let (writer, guard) = file_writer(log_dir)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
