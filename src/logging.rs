//! Logging capability injected into services, and process-wide tracing setup

use std::sync::Mutex;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Logging capability handed to each service at construction.
///
/// `location` identifies the operation (e.g. `"Books - Create"`).
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, location: &str, message: &str);

    fn info(&self, location: &str, message: &str) {
        self.log(Level::INFO, location, message);
    }

    fn warn(&self, location: &str, message: &str) {
        self.log(Level::WARN, location, message);
    }

    fn debug(&self, location: &str, message: &str) {
        self.log(Level::DEBUG, location, message);
    }

    fn error(&self, location: &str, message: &str) {
        self.log(Level::ERROR, location, message);
    }
}

/// Forwards to the `tracing` subscriber installed by [`init_tracing`]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, location: &str, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "bookstore_api::activity", location, "{}", message),
            Level::WARN => tracing::warn!(target: "bookstore_api::activity", location, "{}", message),
            Level::INFO => tracing::info!(target: "bookstore_api::activity", location, "{}", message),
            Level::DEBUG => tracing::debug!(target: "bookstore_api::activity", location, "{}", message),
            _ => tracing::trace!(target: "bookstore_api::activity", location, "{}", message),
        }
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: Level, _location: &str, _message: &str) {}
}

/// One captured log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub location: String,
    pub message: String,
}

/// Keeps every record in memory, for assertions in tests
#[derive(Debug, Default)]
pub struct CapturingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl CapturingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Records at `level`, in emission order
    pub fn at_level(&self, level: Level) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level == level)
            .collect()
    }
}

impl Logger for CapturingLogger {
    fn log(&self, level: Level, location: &str, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push(LogRecord {
                level,
                location: location.to_string(),
                message: message.to_string(),
            });
        }
    }
}

/// Install the global tracing subscriber.
///
/// The returned guard flushes the file writer and must live as long as the process.
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bookstore_api={},tower_http=debug", config.level).into());

    let json = config.format.eq_ignore_ascii_case("json");

    let stdout_layer = if json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let (file_layer, guard) = match config.directory.as_deref() {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "bookstore-api.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            let layer = if json { layer.json().boxed() } else { layer.boxed() };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}
