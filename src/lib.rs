//! # fastlog
//!
//! A high-throughput log dispatch engine with synchronous and asynchronous
//! modes and multiple output handlers.
//!
//! ## Features
//!
//! - **Async dispatch**: bounded queue and a single consumer thread, so
//!   logging never does IO on the caller's thread
//! - **Multiple handlers**: console, size-rotating file, interval-rotating
//!   file, and remote HTTP delivery
//! - **Per-handler filtering**: level thresholds and keyword filters
//! - **Structured context**: insertion-ordered key/value fields in plain
//!   or JSON output
//! - **Overflow control**: drop, block, or block-with-timeout when the
//!   queue is full, with drop accounting
//!
//! ## Quick start
//!
//! ```no_run
//! use fastlog::{HandlerConfig, LogLevel, Logger, LoggerConfig};
//! use std::time::Duration;
//!
//! # fn main() -> fastlog::Result<()> {
//! let logger = Logger::new(
//!     LoggerConfig::new()
//!         .with_handler(HandlerConfig::console().with_level(LogLevel::Info))
//!         .with_handler(HandlerConfig::file("logs/app.log").with_rotation(10 * 1024 * 1024, 5))
//!         .with_async_mode(true),
//! )?;
//! logger.start()?;
//!
//! logger.info("service ready")?;
//!
//! logger.shutdown(Duration::from_secs(5))?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        FieldValue, Handler, HandlerConfig, HandlerType, LogContext, LogFormat, LogLevel,
        LogRecord, Logger, LoggerConfig, LoggerError, LoggerMetrics, OverflowCallback,
        OverflowPolicy, RecordCallback, Result, ShutdownReport, TimestampFormat,
        DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::handlers::{
        ConsoleHandler, HttpHandler, RotatingFileHandler, TimedRotatingFileHandler,
    };
}

pub use crate::core::{
    FieldValue, Handler, HandlerConfig, HandlerType, LogContext, LogFormat, LogLevel, LogRecord,
    Logger, LoggerConfig, LoggerError, LoggerMetrics, OverflowCallback, OverflowPolicy,
    RecordCallback, Result, ShutdownReport, TimestampFormat, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::handlers::{
    ConsoleHandler, HttpHandler, RotatingFileHandler, TimedRotatingFileHandler,
};
