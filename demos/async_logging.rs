//! Asynchronous logging example
//!
//! Demonstrates the bounded queue, multi-threaded producers, flush, and
//! the shutdown drain report.
//!
//! Run with: cargo run --example async_logging

use fastlog::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== fastlog - Async Logging Example ===\n");

    let path = std::env::temp_dir().join("fastlog_async_example.log");

    let logger = Arc::new(Logger::new(
        LoggerConfig::new()
            .with_handler(HandlerConfig::console().with_level(LogLevel::Warning))
            .with_handler(
                HandlerConfig::file(&path)
                    .with_level(LogLevel::Debug)
                    .with_format(LogFormat::Json),
            )
            .with_async_mode(true)
            .with_queue_capacity(4096),
    )?);
    logger.start()?;

    println!("1. Four producer threads, 250 records each:");
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..250 {
                    let ctx = LogContext::new()
                        .with_field("worker", worker)
                        .with_field("seq", i);
                    let _ = logger.info_with_context("processing item", ctx);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("producer thread panicked");
    }

    println!("2. Flushing so everything so far is durable...");
    logger.flush()?;

    logger.warning("This line also reaches the console")?;

    let report = logger.shutdown(Duration::from_secs(5))?;
    println!("\n3. Shutdown report:");
    println!("   drained:     {}", report.drained);
    println!("   undelivered: {}", report.undelivered);

    let metrics = logger.metrics();
    println!("\n4. Metrics:");
    println!("   enqueued:   {}", metrics.total_enqueued());
    println!("   dispatched: {}", metrics.total_dispatched());
    println!("   dropped:    {}", metrics.dropped_count());

    println!("\nJSON records written to {}", path.display());
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
