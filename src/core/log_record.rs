//! Log record structure

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable value describing one log event.
///
/// Created by the [`Logger`](super::logger::Logger), handed to the
/// dispatcher, and read-only for every handler, formatter, and callback
/// that sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub context: LogContext,
    /// Logical logger/component name, if any
    pub source: Option<String>,
}

impl LogRecord {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a message can never masquerade as additional log lines.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: Self::sanitize_message(&message),
            context: LogContext::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_sanitization() {
        let record = LogRecord::new(
            LogLevel::Info,
            "line one\nFAKE [ERROR] injected\ttab".to_string(),
        );
        assert!(!record.message.contains('\n'));
        assert!(!record.message.contains('\t'));
        assert!(record.message.contains("\\n"));
    }

    #[test]
    fn test_builder_methods() {
        let record = LogRecord::new(LogLevel::Error, "boom".to_string())
            .with_source("billing")
            .with_context(LogContext::new().with_field("order_id", 991));

        assert_eq!(record.source.as_deref(), Some("billing"));
        assert_eq!(record.context.len(), 1);
        assert_eq!(record.level, LogLevel::Error);
    }
}
