//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use fastlog::prelude::*;
//! use fastlog::{context, info};
//!
//! let logger = Logger::new(LoggerConfig::new()).unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//!
//! // With structured context
//! logger
//!     .info_with_context("request done", context! { "status" => 200 })
//!     .unwrap();
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use fastlog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::new()).unwrap();
/// use fastlog::log;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use fastlog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::new()).unwrap();
/// use fastlog::debug;
/// debug!(logger, "Debug information").unwrap();
/// debug!(logger, "Counter value: {}", 10).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use fastlog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::new()).unwrap();
/// use fastlog::info;
/// info!(logger, "Application started").unwrap();
/// info!(logger, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use fastlog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::new()).unwrap();
/// use fastlog::warning;
/// warning!(logger, "Low disk space").unwrap();
/// warning!(logger, "Retry attempt {} of {}", 3, 5).unwrap();
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use fastlog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::new()).unwrap();
/// use fastlog::error;
/// error!(logger, "Failed to connect to database").unwrap();
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// # use fastlog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::new()).unwrap();
/// use fastlog::critical;
/// critical!(logger, "Unable to recover from error: {}", "disk full").unwrap();
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

/// Build a [`LogContext`](crate::LogContext) from key/value pairs,
/// preserving the order they are written in.
///
/// # Examples
///
/// ```
/// use fastlog::context;
///
/// let ctx = context! {
///     "user_id" => 42,
///     "action" => "login",
///     "success" => true,
/// };
/// assert_eq!(ctx.len(), 3);
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::LogContext::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut ctx = $crate::LogContext::new();
            $(
                ctx.add_field($key, $value);
            )+
            ctx
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger, LoggerConfig};

    fn quiet_logger() -> Logger {
        // No handlers configured, so nothing reaches any output
        Logger::new(LoggerConfig::new()).unwrap()
    }

    #[test]
    fn test_log_macro() {
        let logger = quiet_logger();
        log!(logger, LogLevel::Info, "Test message").unwrap();
        log!(logger, LogLevel::Info, "Formatted: {}", 42).unwrap();
    }

    #[test]
    fn test_level_macros() {
        let logger = quiet_logger();
        debug!(logger, "Debug message").unwrap();
        info!(logger, "Items: {}", 100).unwrap();
        warning!(logger, "Retry {} of {}", 1, 3).unwrap();
        error!(logger, "Code: {}", 500).unwrap();
        critical!(logger, "Critical failure: {}", "system").unwrap();
    }

    #[test]
    fn test_context_macro_preserves_order() {
        let ctx = context! {
            "zebra" => 1,
            "apple" => 2,
        };
        let keys: Vec<&str> = ctx.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zebra", "apple"]);
    }

    #[test]
    fn test_empty_context_macro() {
        let ctx = context! {};
        assert!(ctx.is_empty());
    }
}
