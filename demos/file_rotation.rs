//! File rotation example
//!
//! Writes enough records to a size-rotated file to produce a backup chain,
//! then shows the resulting files.
//!
//! Run with: cargo run --example file_rotation

use fastlog::prelude::*;
use std::fs;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== fastlog - File Rotation Example ===\n");

    let dir = std::env::temp_dir().join("fastlog_rotation_example");
    fs::create_dir_all(&dir)?;
    let path = dir.join("app.log");

    // Rotate at 1 KiB, keep 3 backups
    let logger = Logger::new(
        LoggerConfig::new().with_handler(
            HandlerConfig::file(&path)
                .with_level(LogLevel::Debug)
                .with_rotation(1024, 3),
        ),
    )?;

    println!("Writing 100 records to {}", path.display());
    for i in 0..100 {
        logger.info(format!("Record number {} with some padding text", i))?;
    }
    logger.shutdown(Duration::from_secs(2))?;

    println!("\nResulting files:");
    for index in [0usize, 1, 2, 3] {
        let candidate = if index == 0 {
            path.clone()
        } else {
            path.with_extension(format!("log.{}", index))
        };
        if let Ok(meta) = fs::metadata(&candidate) {
            println!("  {} ({} bytes)", candidate.display(), meta.len());
        }
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
