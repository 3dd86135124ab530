//! Logger and handler configuration
//!
//! Configuration is validated eagerly when the [`Logger`](super::logger::Logger)
//! is constructed; an invalid config never reaches the dispatch path. Both
//! structs are immutable for the logger's lifetime.

use std::path::PathBuf;
use std::time::Duration;

use super::error::{LoggerError, Result};
use super::format::LogFormat;
use super::log_level::LogLevel;
use super::overflow_policy::{OverflowCallback, OverflowPolicy, RecordCallback};
use super::timestamp::TimestampFormat;

/// Default async queue capacity when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Kind of output handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerType {
    /// Write to the process output streams
    Console,
    /// Append to a file with size-based rotation
    File,
    /// Append to a file with interval-based rotation
    TimedFile,
    /// POST each record as JSON to a remote endpoint
    Custom,
}

/// Configuration for one output handler
///
/// # Example
///
/// ```
/// use fastlog::{HandlerConfig, LogFormat, LogLevel};
///
/// let console = HandlerConfig::console()
///     .with_level(LogLevel::Warning)
///     .with_format(LogFormat::Json);
///
/// let file = HandlerConfig::file("logs/app.log")
///     .with_rotation(10 * 1024 * 1024, 5);
/// ```
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub handler_type: HandlerType,
    /// Inclusive level threshold; records below it are skipped
    pub level: LogLevel,
    pub format: LogFormat,
    /// Target path, required for File and TimedFile
    pub filename: Option<PathBuf>,
    /// Rotation threshold in bytes, File only
    pub rotate_size: Option<u64>,
    /// Number of rotated files to retain; 0 keeps no history
    pub rotate_count: usize,
    /// Rotation interval, TimedFile only
    pub rotate_interval: Option<Duration>,
    /// Record is skipped for this handler unless its message contains
    /// at least one of these substrings
    pub keyword_filters: Option<Vec<String>>,
    /// Remote endpoint URL, required for Custom
    pub endpoint: Option<String>,
    pub timestamp_format: TimestampFormat,
}

impl HandlerConfig {
    fn base(handler_type: HandlerType) -> Self {
        Self {
            handler_type,
            level: LogLevel::Info,
            format: LogFormat::Plain,
            filename: None,
            rotate_size: None,
            rotate_count: 5,
            rotate_interval: None,
            keyword_filters: None,
            endpoint: None,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Console handler at Info level, plain format
    pub fn console() -> Self {
        Self::base(HandlerType::Console)
    }

    /// Size-rotating file handler for `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let mut cfg = Self::base(HandlerType::File);
        cfg.filename = Some(path.into());
        cfg
    }

    /// Interval-rotating file handler for `path`
    pub fn timed_file(path: impl Into<PathBuf>, interval: Duration) -> Self {
        let mut cfg = Self::base(HandlerType::TimedFile);
        cfg.filename = Some(path.into());
        cfg.rotate_interval = Some(interval);
        cfg
    }

    /// Remote HTTP handler posting to `endpoint`
    pub fn custom(endpoint: impl Into<String>) -> Self {
        let mut cfg = Self::base(HandlerType::Custom);
        cfg.endpoint = Some(endpoint.into());
        cfg
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set size-based rotation: threshold in bytes and retained file count
    #[must_use]
    pub fn with_rotation(mut self, rotate_size: u64, rotate_count: usize) -> Self {
        self.rotate_size = Some(rotate_size);
        self.rotate_count = rotate_count;
        self
    }

    #[must_use]
    pub fn with_rotate_count(mut self, rotate_count: usize) -> Self {
        self.rotate_count = rotate_count;
        self
    }

    #[must_use]
    pub fn with_keyword_filters(mut self, keywords: Vec<String>) -> Self {
        self.keyword_filters = Some(keywords);
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Short name identifying this handler in diagnostics
    pub fn display_name(&self) -> String {
        match self.handler_type {
            HandlerType::Console => "console".to_string(),
            HandlerType::File => format!(
                "file:{}",
                self.filename
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
            HandlerType::TimedFile => format!(
                "timed_file:{}",
                self.filename
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            ),
            HandlerType::Custom => format!(
                "http:{}",
                self.endpoint.as_deref().unwrap_or_default()
            ),
        }
    }

    /// Validate this handler configuration
    pub fn validate(&self) -> Result<()> {
        match self.handler_type {
            HandlerType::Console => {}
            HandlerType::File => {
                if self.filename.is_none() {
                    return Err(LoggerError::config(
                        "HandlerConfig",
                        "FILE handler requires a filename",
                    ));
                }
                if self.rotate_size == Some(0) {
                    return Err(LoggerError::config(
                        "HandlerConfig",
                        "rotate_size must be greater than zero",
                    ));
                }
                if self.rotate_interval.is_some() {
                    return Err(LoggerError::config(
                        "HandlerConfig",
                        "rotate_interval only applies to TIMED_FILE handlers",
                    ));
                }
            }
            HandlerType::TimedFile => {
                if self.filename.is_none() {
                    return Err(LoggerError::config(
                        "HandlerConfig",
                        "TIMED_FILE handler requires a filename",
                    ));
                }
                match self.rotate_interval {
                    None => {
                        return Err(LoggerError::config(
                            "HandlerConfig",
                            "TIMED_FILE handler requires a rotate_interval",
                        ));
                    }
                    Some(interval) if interval.is_zero() => {
                        return Err(LoggerError::config(
                            "HandlerConfig",
                            "rotate_interval must be greater than zero",
                        ));
                    }
                    Some(_) => {}
                }
                if self.rotate_size.is_some() {
                    return Err(LoggerError::config(
                        "HandlerConfig",
                        "rotate_size only applies to FILE handlers",
                    ));
                }
            }
            HandlerType::Custom => match self.endpoint.as_deref() {
                None | Some("") => {
                    return Err(LoggerError::config(
                        "HandlerConfig",
                        "CUSTOM handler requires an endpoint",
                    ));
                }
                Some(_) => {}
            },
        }

        if let Some(ref keywords) = self.keyword_filters {
            if keywords.is_empty() {
                return Err(LoggerError::config(
                    "HandlerConfig",
                    "keyword_filters must not be empty when set",
                ));
            }
        }

        Ok(())
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::console()
    }
}

/// Top-level logger configuration
///
/// `handlers` order is the dispatch order. The default is an empty handler
/// list in synchronous mode; a logger without handlers accepts records and
/// discards them.
#[derive(Clone, Default)]
pub struct LoggerConfig {
    pub handlers: Vec<HandlerConfig>,
    pub async_mode: bool,
    /// Invoked once per record after all handlers have been attempted
    pub callback: Option<RecordCallback>,
    /// Async queue capacity; `None` uses [`DEFAULT_QUEUE_CAPACITY`]
    pub queue_capacity: Option<usize>,
    pub overflow_policy: OverflowPolicy,
    /// Invoked with the cumulative dropped count when records are dropped
    pub on_overflow: Option<OverflowCallback>,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_handler(mut self, handler: HandlerConfig) -> Self {
        self.handlers.push(handler);
        self
    }

    #[must_use]
    pub fn with_async_mode(mut self, async_mode: bool) -> Self {
        self.async_mode = async_mode;
        self
    }

    #[must_use]
    pub fn with_callback(mut self, callback: RecordCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    #[must_use]
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    #[must_use]
    pub fn with_on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Effective queue capacity
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == Some(0) {
            return Err(LoggerError::config(
                "LoggerConfig",
                "queue_capacity must be greater than zero",
            ));
        }
        for handler in &self.handlers {
            handler.validate()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("handlers", &self.handlers)
            .field("async_mode", &self.async_mode)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .field("queue_capacity", &self.queue_capacity)
            .field("overflow_policy", &self.overflow_policy)
            .finish()
    }
}
