//! Logging for timerender
//!
//! Events go to a daily-rotated file under the XDG state directory
//! (`~/.local/state/timerender/timerender.log`). `logging.console` also
//! mirrors them to stderr, which is what `timerender watch --verbose` uses
//! to show refresh passes as they happen.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "timerender.log";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. The returned guard must
/// be held for the life of the process so buffered file writes are flushed.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = log_dir(config);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .max_log_files(config.max_files.max(1))
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("failed to create log file: {}", e)))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = config.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter(config))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to install logger: {}", e)))?;

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        console = config.console,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Initialize logging for tests (logs to the test writer)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

fn filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Directory log files are written to: `logging.directory` if set,
/// otherwise the XDG state directory.
pub fn log_dir(config: &LoggingConfig) -> PathBuf {
    config
        .directory
        .clone()
        .unwrap_or_else(Config::state_dir)
}

/// Keeps the background log writer alive. Dropping it flushes pending writes.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Returns the default log file path
pub fn log_file_path() -> PathBuf {
    Config::log_path()
}
