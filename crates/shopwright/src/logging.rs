//! Session-scoped logging.
//!
//! A [`LogContext`] is built once per test session and installs a
//! `tracing` subscriber for as long as it lives: console output plus a
//! size-rotated log file. Dropping the context restores the previous
//! dispatcher, so nothing is left behind in global state.

use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::subscriber::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::result::{ShopError, ShopResult};

/// Default file size before rotation (5 MiB)
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default number of rotated backups kept
pub const DEFAULT_BACKUPS: usize = 3;

/// Log file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `timestamp LEVEL target: message`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `shopwright=debug`
    pub level: String,
    /// Directory holding the log file
    pub dir: PathBuf,
    /// Log file name
    pub file_name: String,
    /// Rotate once the file has grown past this many bytes
    pub max_bytes: u64,
    /// Rotated files kept (`automation.log.1` .. `.N`)
    pub backups: usize,
    /// Mirror log lines to stdout
    pub console: bool,
    /// File format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
            file_name: "automation.log".to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
            backups: DEFAULT_BACKUPS,
            console: true,
            format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    /// Set the log directory
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Set the filter directive
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Enable or disable console output
    #[must_use]
    pub const fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Full path of the active log file
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

fn rotating_file(config: &LogConfig) -> io::Result<FileRotate<AppendCount>> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let max_bytes = usize::try_from(config.max_bytes).unwrap_or(usize::MAX);
    Ok(FileRotate::new(
        path,
        AppendCount::new(config.backups),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}

/// Logging installed for the lifetime of one test session.
#[derive(Debug)]
pub struct LogContext {
    log_path: PathBuf,
    _dispatch: DefaultGuard,
    // flushes the background writer on drop
    _worker: WorkerGuard,
}

impl LogContext {
    /// Install console + rotating-file logging until the context is dropped.
    pub fn init(config: &LogConfig) -> ShopResult<Self> {
        let filter = EnvFilter::try_new(&config.level)
            .map_err(|e| ShopError::config(format!("invalid log level '{}': {e}", config.level)))?;

        let log_path = config.log_path();
        let (make_file, worker) = tracing_appender::non_blocking(rotating_file(config)?);

        let file_layer = match config.format {
            LogFormat::Text => fmt::layer()
                .with_ansi(false)
                .with_writer(make_file)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(make_file)
                .boxed(),
        };
        let console_layer = config
            .console
            .then(|| fmt::layer().with_target(false).with_writer(io::stdout));

        let subscriber = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .with(filter);
        let dispatch = tracing::subscriber::set_default(subscriber);

        tracing::info!(log_file = %log_path.display(), "Test session setup complete");
        Ok(Self {
            log_path,
            _dispatch: dispatch,
            _worker: worker,
        })
    }

    /// Path of the active log file
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl Drop for LogContext {
    fn drop(&mut self) {
        tracing::info!("Test session teardown");
    }
}
