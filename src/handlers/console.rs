//! Console handler implementation

use crate::core::{Handler, LogLevel, LogRecord, Result};
use colored::Colorize;

pub struct ConsoleHandler {
    use_colors: bool,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ConsoleHandler {
    fn write(&mut self, record: &LogRecord, rendered: &str) -> Result<()> {
        let line = if self.use_colors {
            rendered.color(record.level.color_code()).to_string()
        } else {
            rendered.to_string()
        };

        // Route Error and Critical levels to stderr, others to stdout
        match record.level {
            LogLevel::Error | LogLevel::Critical => eprintln!("{}", line),
            _ => println!("{}", line),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        // Flush both streams since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Nothing to release; the process owns the streams
        self.flush()
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogFormat;
    use crate::core::TimestampFormat;

    #[test]
    fn test_console_write_does_not_fail() {
        let mut handler = ConsoleHandler::with_colors(false);
        let record = LogRecord::new(LogLevel::Info, "hello console".to_string());
        let rendered = LogFormat::Plain.render(&record, &TimestampFormat::default());

        assert!(handler.write(&record, &rendered).is_ok());
        assert!(handler.flush().is_ok());
        assert!(handler.close().is_ok());
    }
}
