//! Rotation decision and file-shuffle logic shared by the file handlers
//!
//! Rotated files are named `<base>.<n>` with `n = 1` the most recent,
//! ascending to `backup_count`; anything beyond that is deleted on the
//! next rotation. With `backup_count = 0` rotation still happens but no
//! history is kept: the current file is simply removed so writes start
//! fresh. Callers must flush and close the current file before `apply`,
//! so no write is lost or interleaved across the rotation boundary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::core::error::{LoggerError, Result};

/// Naming and retention scheme for rotated log files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Number of rotated files to keep
    pub backup_count: usize,
}

impl RotationPolicy {
    pub fn new(backup_count: usize) -> Self {
        Self { backup_count }
    }

    /// True when writing `incoming` more bytes would push the file past `max`
    pub fn size_exceeded(current_size: u64, incoming: u64, max_bytes: u64) -> bool {
        current_size + incoming > max_bytes
    }

    /// Advance a rotation deadline past `now` by whole intervals,
    /// catching up if several intervals elapsed while idle
    pub fn advance_deadline(
        mut next: SystemTime,
        interval: Duration,
        now: SystemTime,
    ) -> SystemTime {
        while next <= now {
            next += interval;
        }
        next
    }

    /// Path of the `index`-th rotated file for `base`
    pub fn backup_path(base: &Path, index: usize) -> PathBuf {
        let mut path = base.to_path_buf();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    /// Perform the rename/retention sequence for `base`.
    ///
    /// The caller has already flushed and closed the current file.
    pub fn apply(&self, base: &Path) -> Result<()> {
        if self.backup_count == 0 {
            // No history retained: drop the current file so it starts fresh
            if base.exists() {
                fs::remove_file(base).map_err(|e| {
                    LoggerError::file_rotation(
                        base.display().to_string(),
                        format!("Failed to truncate current file: {}", e),
                    )
                })?;
            }
            return Ok(());
        }

        // Delete the file that would fall past the retention limit
        let expired = Self::backup_path(base, self.backup_count);
        if expired.exists() {
            fs::remove_file(&expired).map_err(|e| {
                LoggerError::file_rotation(
                    expired.display().to_string(),
                    format!("Failed to remove expired backup: {}", e),
                )
            })?;
        }

        // Shift base.k -> base.k+1 for k = backup_count-1 .. 1
        for i in (1..self.backup_count).rev() {
            let old_path = Self::backup_path(base, i);
            let new_path = Self::backup_path(base, i + 1);

            if old_path.exists() {
                // rename atomically replaces an existing destination on most
                // platforms; fall back to remove-then-rename where it fails
                if fs::rename(&old_path, &new_path).is_err() {
                    if new_path.exists() {
                        let _ = fs::remove_file(&new_path);
                    }
                    fs::rename(&old_path, &new_path).map_err(|e| {
                        LoggerError::file_rotation(
                            old_path.display().to_string(),
                            format!("Failed to shift backup files: {}", e),
                        )
                    })?;
                }
            }
        }

        // Current file becomes base.1
        if base.exists() {
            let first = Self::backup_path(base, 1);
            fs::rename(base, &first).map_err(|e| {
                LoggerError::file_rotation(
                    base.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_size_exceeded_boundary() {
        // Rotation triggers only when the write would exceed the limit
        assert!(!RotationPolicy::size_exceeded(60, 40, 100));
        assert!(RotationPolicy::size_exceeded(61, 40, 100));
        assert!(RotationPolicy::size_exceeded(100, 1, 100));
    }

    #[test]
    fn test_advance_deadline_catches_up() {
        let start = SystemTime::UNIX_EPOCH;
        let interval = Duration::from_secs(10);
        let now = start + Duration::from_secs(35);

        let next = RotationPolicy::advance_deadline(start, interval, now);
        assert_eq!(next, start + Duration::from_secs(40));
    }

    #[test]
    fn test_backup_path_naming() {
        let base = Path::new("/var/log/app.log");
        assert_eq!(
            RotationPolicy::backup_path(base, 1),
            PathBuf::from("/var/log/app.log.1")
        );
        assert_eq!(
            RotationPolicy::backup_path(base, 3),
            PathBuf::from("/var/log/app.log.3")
        );
    }

    #[test]
    fn test_apply_shifts_and_retains() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("app.log");

        fs::write(&base, "current").unwrap();
        fs::write(RotationPolicy::backup_path(&base, 1), "one").unwrap();
        fs::write(RotationPolicy::backup_path(&base, 2), "two").unwrap();

        let policy = RotationPolicy::new(2);
        policy.apply(&base).unwrap();

        // "two" aged out, "one" shifted to .2, current became .1
        assert!(!base.exists());
        assert_eq!(
            fs::read_to_string(RotationPolicy::backup_path(&base, 1)).unwrap(),
            "current"
        );
        assert_eq!(
            fs::read_to_string(RotationPolicy::backup_path(&base, 2)).unwrap(),
            "one"
        );
        assert!(!RotationPolicy::backup_path(&base, 3).exists());
    }

    #[test]
    fn test_apply_with_zero_retention_truncates() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("app.log");
        fs::write(&base, "current").unwrap();

        let policy = RotationPolicy::new(0);
        policy.apply(&base).unwrap();

        assert!(!base.exists());
        assert!(!RotationPolicy::backup_path(&base, 1).exists());
    }
}
