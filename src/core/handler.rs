//! Handler trait for log output destinations
//!
//! A handler consumes a rendered entry and performs the side effect
//! (console write, file write, network send). The record is also passed
//! so handlers with their own wire contract (HTTP) can re-render it.
//! Failures from any of these operations are isolated by the dispatcher
//! and never reach the caller of `log()`.

use super::{error::Result, log_record::LogRecord};

pub trait Handler: Send {
    fn write(&mut self, record: &LogRecord, rendered: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    /// Release owned resources. Called exactly once during shutdown.
    fn close(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
