//! Output formats for log records
//!
//! Both formats are pure functions from record to text. JSON output keeps
//! a fixed set of leading keys followed by the context fields in insertion
//! order, so the output is diff-stable and parseable back.

use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Render format for a handler's output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Human-readable line
    ///
    /// Example: `[2025-01-08 10:30:45] [INFO] Request processed user_id=42`
    #[default]
    Plain,

    /// JSON object for machine processing
    ///
    /// Example: `{"timestamp":"...","level":"INFO","message":"...","source":null,"user_id":42}`
    Json,
}

impl LogFormat {
    /// Format a log record according to this output format
    pub fn render(&self, record: &LogRecord, timestamp_format: &TimestampFormat) -> String {
        match self {
            LogFormat::Plain => self.render_plain(record, timestamp_format),
            LogFormat::Json => self.render_json(record, timestamp_format),
        }
    }

    fn render_plain(&self, record: &LogRecord, timestamp_format: &TimestampFormat) -> String {
        let timestamp_str = timestamp_format.format(&record.timestamp);

        let mut line = match record.source {
            Some(ref source) => format!(
                "[{}] [{}] ({}) {}",
                timestamp_str,
                record.level.to_str(),
                source,
                record.message
            ),
            None => format!(
                "[{}] [{}] {}",
                timestamp_str,
                record.level.to_str(),
                record.message
            ),
        };

        if !record.context.is_empty() {
            line.push(' ');
            line.push_str(&record.context.format_fields());
        }

        line
    }

    fn render_json(&self, record: &LogRecord, timestamp_format: &TimestampFormat) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            timestamp_format.to_json_value(&record.timestamp),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(record.level.to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(record.message.clone()),
        );
        json_obj.insert(
            "source".to_string(),
            record
                .source
                .as_ref()
                .map(|s| serde_json::Value::String(s.clone()))
                .unwrap_or(serde_json::Value::Null),
        );

        // Context keys merge at the top level, after the fixed keys
        for (key, value) in record.context.fields() {
            json_obj.insert(key.to_string(), value.to_json_value());
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }
}
