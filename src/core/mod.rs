//! Core types: records, configuration, and the dispatch engine

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod handler;
pub mod log_context;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod timestamp;

pub use config::{HandlerConfig, HandlerType, LoggerConfig, DEFAULT_QUEUE_CAPACITY};
pub use error::{LoggerError, Result};
pub use format::LogFormat;
pub use handler::Handler;
pub use log_context::{FieldValue, LogContext};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, ShutdownReport, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{OverflowCallback, OverflowPolicy, RecordCallback};
pub use timestamp::TimestampFormat;
