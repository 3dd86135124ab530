//! Interval-rotating file handler
//!
//! Rotates on a fixed wall-clock interval instead of file size. The
//! deadline is set when the file first opens and advances by whole
//! intervals on rotation, catching up if several intervals passed while
//! the handler sat idle.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::core::error::{LoggerError, Result};
use crate::core::{Handler, LogRecord};

use super::rotation::RotationPolicy;

pub struct TimedRotatingFileHandler {
    base_path: PathBuf,
    interval: Duration,
    retention: RotationPolicy,
    writer: Option<BufWriter<File>>,
    /// Deadline for the next rotation; set when the file first opens
    next_rotation: Option<SystemTime>,
    name: String,
}

impl TimedRotatingFileHandler {
    pub fn new(path: impl Into<PathBuf>, interval: Duration, backup_count: usize) -> Self {
        let base_path = path.into();
        let name = format!("timed_file:{}", base_path.display());
        Self {
            base_path,
            interval,
            retention: RotationPolicy::new(backup_count),
            writer: None,
            next_rotation: None,
            name,
        }
    }

    pub fn next_rotation(&self) -> Option<SystemTime> {
        self.next_rotation
    }

    fn open_file(&self) -> Result<BufWriter<File>> {
        if let Some(parent) = self.base_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "create log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::handler(&self.name, format!("Failed to open: {}", e))
            })?;
        Ok(BufWriter::new(file))
    }

    fn ensure_open(&mut self) -> Result<()> {
        if self.writer.is_none() {
            self.writer = Some(self.open_file()?);
            if self.next_rotation.is_none() {
                self.next_rotation = Some(SystemTime::now() + self.interval);
            }
        }
        Ok(())
    }

    fn rotate(&mut self, now: SystemTime) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        self.retention.apply(&self.base_path)?;
        self.writer = Some(self.open_file()?);

        if let Some(next) = self.next_rotation {
            self.next_rotation = Some(RotationPolicy::advance_deadline(
                next,
                self.interval,
                now,
            ));
        }
        Ok(())
    }
}

impl Handler for TimedRotatingFileHandler {
    fn write(&mut self, _record: &LogRecord, rendered: &str) -> Result<()> {
        self.ensure_open()?;

        let now = SystemTime::now();
        if matches!(self.next_rotation, Some(next) if now >= next) {
            self.rotate(now)?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::handler(&self.name, "Writer not initialized"))?;
        writer.write_all(rendered.as_bytes()).map_err(|e| {
            LoggerError::handler(&self.name, format!("Failed to write log entry: {}", e))
        })?;
        writer.write_all(b"\n").map_err(|e| {
            LoggerError::handler(&self.name, format!("Failed to write log entry: {}", e))
        })?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::handler(&self.name, format!("Failed to flush: {}", e))
            })?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::handler(&self.name, format!("Failed to flush on close: {}", e))
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TimedRotatingFileHandler {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogFormat, LogLevel, TimestampFormat};
    use tempfile::tempdir;

    fn write_line(handler: &mut TimedRotatingFileHandler, message: &str) {
        let record = LogRecord::new(LogLevel::Info, message.to_string());
        let rendered = LogFormat::Plain.render(&record, &TimestampFormat::Simple);
        handler.write(&record, &rendered).unwrap();
    }

    #[test]
    fn test_deadline_set_on_first_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timed.log");

        let mut handler = TimedRotatingFileHandler::new(&path, Duration::from_secs(3600), 3);
        assert!(handler.next_rotation().is_none());

        write_line(&mut handler, "first");
        assert!(handler.next_rotation().is_some());
        handler.close().unwrap();
    }

    #[test]
    fn test_rotation_after_interval_elapses() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timed.log");

        let mut handler = TimedRotatingFileHandler::new(&path, Duration::from_millis(20), 2);
        write_line(&mut handler, "before rotation");
        handler.flush().unwrap();

        std::thread::sleep(Duration::from_millis(40));
        write_line(&mut handler, "after rotation");
        handler.close().unwrap();

        let backup = RotationPolicy::backup_path(&path, 1);
        assert!(backup.exists());
        assert!(fs::read_to_string(&backup).unwrap().contains("before rotation"));
        assert!(fs::read_to_string(&path).unwrap().contains("after rotation"));
    }

    #[test]
    fn test_deadline_catches_up_past_now() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timed.log");

        let mut handler = TimedRotatingFileHandler::new(&path, Duration::from_millis(10), 1);
        write_line(&mut handler, "one");

        // Sleep across several intervals; the next write rotates once and
        // the new deadline lands in the future
        std::thread::sleep(Duration::from_millis(55));
        write_line(&mut handler, "two");

        let next = handler.next_rotation().unwrap();
        assert!(next > SystemTime::now() - Duration::from_millis(1));
        handler.close().unwrap();
    }
}
