//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to
//! `$XDG_STATE_HOME/kbd-lightning/app.log` and rotation on application startup
//! keeping 9 historical files.

use crate::error::{LightningError, Result, StringError};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Maximum number of historical log files to keep (app.log.1 through app.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Directory holding the log files
///
/// `$XDG_STATE_HOME/kbd-lightning`, else `$HOME/.local/state/kbd-lightning`,
/// else `./kbd-lightning`.
pub fn log_dir() -> PathBuf {
    let base = std::env::var_os("XDG_STATE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .filter(|v| !v.is_empty())
                .map(|home| PathBuf::from(home).join(".local").join("state"))
        })
        .unwrap_or_else(|| PathBuf::from("."));

    base.join("kbd-lightning")
}

/// Initialize the logging system
///
/// Log level defaults to INFO but can be configured via `RUST_LOG` environment variable.
pub fn init_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("app.log");
    rotate_logs_on_startup(&log_path)?;

    // Rotation is handled on startup, never by the appender
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("app")
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(|e| LightningError::ConfigError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LightningError::ConfigError(Box::new(e)))?;

    tracing::info!(
        "kbd-lightning v{} started, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_path.display()
    );

    Ok(())
}

/// Shift `app.log` to `app.log.1`, `app.log.1` to `app.log.2` and so on,
/// dropping the oldest once `MAX_LOG_FILES` are kept
///
/// A fresh `app.log` is created by the appender afterwards.
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| LightningError::ConfigError(StringError::new("Invalid log path")))?;

    let log_name = log_path
        .file_name()
        .ok_or_else(|| LightningError::ConfigError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    let numbered = |i: u8| log_dir.join(format!("{log_name}.{i}"));

    let oldest_log = numbered(MAX_LOG_FILES);
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = numbered(i);
        if current_log.exists() {
            std::fs::rename(&current_log, numbered(i + 1))?;
        }
    }

    std::fs::rename(log_path, numbered(1))?;

    Ok(())
}
