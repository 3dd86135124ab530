//! Basic logger usage example
//!
//! Demonstrates synchronous logging to the console with per-level output,
//! structured context fields, and level thresholds.
//!
//! Run with: cargo run --example basic_usage

use fastlog::prelude::*;
use fastlog::context;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== fastlog - Basic Usage Example ===\n");

    // Synchronous logger with a single console handler
    let logger = Logger::new(
        LoggerConfig::new()
            .with_handler(HandlerConfig::console().with_level(LogLevel::Debug)),
    )?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warning("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.critical("This is a critical message")?;

    println!("\n2. Structured context fields:");
    logger.info_with_context(
        "User logged in",
        context! {
            "user_id" => 42,
            "method" => "oauth",
            "mfa" => true,
        },
    )?;

    println!("\n3. A second logger with a higher threshold:");
    let strict = Logger::new(
        LoggerConfig::new()
            .with_handler(HandlerConfig::console().with_level(LogLevel::Warning)),
    )?;
    strict.debug("Debug message (hidden)")?;
    strict.info("Info message (hidden)")?;
    strict.warning("Warning message (visible)")?;
    strict.shutdown(Duration::from_secs(1))?;

    logger.shutdown(Duration::from_secs(1))?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
