//! Size-rotating file handler
//!
//! Appends rendered entries to a file and rotates when the next write
//! would push the file past `rotate_size` bytes. The file opens lazily
//! on first write and only the single dispatch thread ever touches the
//! handler, so no locking is needed around rotation.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::error::{LoggerError, Result};
use crate::core::{Handler, LogRecord};

use super::rotation::RotationPolicy;

pub struct RotatingFileHandler {
    base_path: PathBuf,
    /// Rotation threshold; `None` means append forever
    max_bytes: Option<u64>,
    retention: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    name: String,
}

impl RotatingFileHandler {
    pub fn new(path: impl Into<PathBuf>, max_bytes: Option<u64>, backup_count: usize) -> Self {
        let base_path = path.into();
        let name = format!("file:{}", base_path.display());
        Self {
            base_path,
            max_bytes,
            retention: RotationPolicy::new(backup_count),
            writer: None,
            current_size: 0,
            name,
        }
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Open the file on first use, creating parent directories and
    /// seeding the size counter from any existing content
    fn ensure_open(&mut self) -> Result<()> {
        if self.writer.is_some() {
            return Ok(());
        }

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

        self.current_size = file
            .metadata()
            .map_err(|e| {
                LoggerError::handler(&self.name, format!("Cannot access file metadata: {}", e))
            })?
            .len();
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Flush and close the current file, shuffle backups, open a fresh file
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
            // Writer dropped here, releasing the file handle before renames
        }

        self.retention.apply(&self.base_path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;
        Ok(())
    }
}

impl Handler for RotatingFileHandler {
    fn write(&mut self, _record: &LogRecord, rendered: &str) -> Result<()> {
        self.ensure_open()?;

        let incoming = rendered.len() as u64 + 1; // trailing newline
        if let Some(max_bytes) = self.max_bytes {
            if RotationPolicy::size_exceeded(self.current_size, incoming, max_bytes) {
                self.rotate()?;
            }
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
        self.current_size += incoming;
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

impl Drop for RotatingFileHandler {
    fn drop(&mut self) {
        // Best effort flush if close() was never reached
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

    fn write_line(handler: &mut RotatingFileHandler, message: &str) {
        let record = LogRecord::new(LogLevel::Info, message.to_string());
        let rendered = LogFormat::Plain.render(&record, &TimestampFormat::Simple);
        handler.write(&record, &rendered).unwrap();
    }

    #[test]
    fn test_lazy_open_on_first_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lazy.log");

        let mut handler = RotatingFileHandler::new(&path, None, 0);
        assert!(!path.exists());

        write_line(&mut handler, "first");
        handler.flush().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deep/app.log");

        let mut handler = RotatingFileHandler::new(&path, None, 0);
        write_line(&mut handler, "entry");
        handler.close().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_rotation_produces_backups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rotate.log");

        // Tiny threshold so every second write rotates
        let mut handler = RotatingFileHandler::new(&path, Some(60), 2);
        for i in 0..5 {
            write_line(&mut handler, &format!("record number {}", i));
        }
        handler.close().unwrap();

        assert!(path.exists());
        assert!(RotationPolicy::backup_path(&path, 1).exists());
    }

    #[test]
    fn test_seeds_size_from_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seed.log");
        fs::write(&path, "x".repeat(90)).unwrap();

        let mut handler = RotatingFileHandler::new(&path, Some(100), 1);
        write_line(&mut handler, "this line pushes past the limit");
        handler.close().unwrap();

        // The pre-existing 90 bytes were rotated out before the write
        assert!(RotationPolicy::backup_path(&path, 1).exists());
        let backup = fs::read_to_string(RotationPolicy::backup_path(&path, 1)).unwrap();
        assert!(backup.starts_with("xxx"));
    }
}
