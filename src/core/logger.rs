//! The logger facade
//!
//! A [`Logger`] owns the dispatcher, the async queue, and the consumer
//! thread. It moves through four lifecycle states: `Init` (constructed,
//! accepting records), `Running` (after [`Logger::start`]), `Stopping`
//! (draining inside [`Logger::shutdown`]) and `Stopped` (handlers closed,
//! further logging refused).
//!
//! In synchronous mode records dispatch inline on the calling thread under
//! a lock. In async mode they go through a bounded crossbeam channel to a
//! single consumer thread, which preserves first-in first-out order per
//! handler. The configured [`OverflowPolicy`] decides what happens when
//! the queue is full; the default drops the new record and counts it
//! rather than ever blocking the caller.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use super::config::LoggerConfig;
use super::dispatcher::Dispatcher;
use super::error::{LoggerError, Result};
use super::log_context::LogContext;
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::metrics::LoggerMetrics;
use super::overflow_policy::OverflowPolicy;

/// Default drain timeout used by `Drop` when shutdown was never called
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Every how many drops (after the first) a warning goes to stderr
const DROP_ALERT_INTERVAL: u64 = 1000;

/// Poll interval while waiting for the consumer thread to drain
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Init,
    Running,
    Stopping,
    Stopped,
}

/// Work items for the consumer thread
enum QueueItem {
    Record(LogRecord),
    /// Flush request; the sender acknowledges once all prior records
    /// have been dispatched and every handler flushed
    Flush(Sender<()>),
}

/// Outcome of [`Logger::shutdown`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Whether the queue fully drained within the timeout
    pub drained: bool,
    /// Records accepted but never dispatched
    pub undelivered: u64,
}

/// The log dispatch engine
///
/// # Example
///
/// ```no_run
/// use fastlog::{HandlerConfig, Logger, LoggerConfig};
///
/// # fn main() -> fastlog::Result<()> {
/// let logger = Logger::new(
///     LoggerConfig::new()
///         .with_handler(HandlerConfig::console())
///         .with_handler(HandlerConfig::file("logs/app.log")),
/// )?;
///
/// logger.info("service starting")?;
/// logger.shutdown(std::time::Duration::from_secs(2))?;
/// # Ok(())
/// # }
/// ```
pub struct Logger {
    config: LoggerConfig,
    state: Mutex<LifecycleState>,
    /// Shared with the consumer thread in async mode
    dispatcher: Arc<Mutex<Dispatcher>>,
    metrics: Arc<LoggerMetrics>,
    /// `None` in sync mode, and after shutdown takes it to disconnect
    /// the channel
    sender: Mutex<Option<Sender<QueueItem>>>,
    /// Held here until `start` hands it to the consumer thread
    receiver: Mutex<Option<Receiver<QueueItem>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Logger {
    /// Create a logger from a validated configuration.
    ///
    /// Construction performs no IO. In async mode the queue exists from
    /// this point, so records logged before [`Logger::start`] are held
    /// and dispatched once the consumer starts.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        config.validate()?;
        let dispatcher = Dispatcher::from_config(&config)?;

        let (sender, receiver) = if config.async_mode {
            let (tx, rx) = bounded(config.queue_capacity());
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };

        Ok(Self {
            config,
            state: Mutex::new(LifecycleState::Init),
            dispatcher: Arc::new(Mutex::new(dispatcher)),
            metrics: Arc::new(LoggerMetrics::new()),
            sender: Mutex::new(sender),
            receiver: Mutex::new(receiver),
            worker: Mutex::new(None),
        })
    }

    /// Start the logger.
    ///
    /// In async mode this spawns the consumer thread; in sync mode it only
    /// marks the logger running. Calling it a second time is an error.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            LifecycleState::Init => {}
            LifecycleState::Running => return Err(LoggerError::AlreadyStarted),
            LifecycleState::Stopping | LifecycleState::Stopped => {
                return Err(LoggerError::LoggerClosed)
            }
        }

        if self.config.async_mode {
            let receiver = self
                .receiver
                .lock()
                .take()
                .ok_or_else(|| LoggerError::other("log queue receiver already taken"))?;
            let dispatcher = Arc::clone(&self.dispatcher);
            let metrics = Arc::clone(&self.metrics);

            let handle = thread::Builder::new()
                .name("fastlog-consumer".to_string())
                .spawn(move || consumer_loop(receiver, dispatcher, metrics))
                .map_err(|e| {
                    LoggerError::other(format!("Failed to spawn consumer thread: {}", e))
                })?;
            *self.worker.lock() = Some(handle);
        }

        *state = LifecycleState::Running;
        Ok(())
    }

    /// Whether the logger still accepts records
    pub fn is_open(&self) -> bool {
        matches!(
            *self.state.lock(),
            LifecycleState::Init | LifecycleState::Running
        )
    }

    /// Snapshot of the current metrics
    pub fn metrics(&self) -> LoggerMetrics {
        (*self.metrics).clone()
    }

    /// Records dropped so far due to queue overflow
    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    /// Log a pre-built record.
    ///
    /// This is the core entry point the level helpers delegate to. Returns
    /// [`LoggerError::LoggerClosed`] once shutdown has begun.
    pub fn log_record(&self, record: LogRecord) -> Result<()> {
        if !self.is_open() {
            return Err(LoggerError::LoggerClosed);
        }

        if self.config.async_mode {
            self.enqueue(record)
        } else {
            self.metrics.record_enqueued();
            self.dispatcher.lock().dispatch(&record, &self.metrics);
            Ok(())
        }
    }

    /// Log a message at the given level
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        self.log_record(LogRecord::new(level, message.into()))
    }

    /// Log a message with structured context fields
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        self.log_record(LogRecord::new(level, message.into()).with_context(context))
    }

    pub fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    pub fn critical(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Critical, message)
    }

    pub fn debug_with_context(
        &self,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        self.log_with_context(LogLevel::Debug, message, context)
    }

    pub fn info_with_context(
        &self,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        self.log_with_context(LogLevel::Info, message, context)
    }

    pub fn warning_with_context(
        &self,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        self.log_with_context(LogLevel::Warning, message, context)
    }

    pub fn error_with_context(
        &self,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        self.log_with_context(LogLevel::Error, message, context)
    }

    pub fn critical_with_context(
        &self,
        message: impl Into<String>,
        context: LogContext,
    ) -> Result<()> {
        self.log_with_context(LogLevel::Critical, message, context)
    }

    /// Flush all handlers.
    ///
    /// In async mode a flush token travels through the queue behind every
    /// record logged before this call, so their output is durable when this
    /// returns. In sync mode (or before `start`) handlers flush inline.
    pub fn flush(&self) -> Result<()> {
        if !self.is_open() {
            return Err(LoggerError::LoggerClosed);
        }

        let running_async = self.config.async_mode && self.worker.lock().is_some();
        if !running_async {
            return self.dispatcher.lock().flush_all();
        }

        let (ack_tx, ack_rx) = bounded(1);
        {
            let sender = self.sender.lock();
            let sender = sender
                .as_ref()
                .ok_or(LoggerError::LoggerClosed)?;
            sender
                .send(QueueItem::Flush(ack_tx))
                .map_err(|_| LoggerError::LoggerClosed)?;
        }
        ack_rx.recv().map_err(|_| LoggerError::LoggerClosed)
    }

    /// Shut the logger down, draining pending records first.
    ///
    /// Waits up to `timeout` for the queue to drain, then flushes and
    /// closes every handler exactly once regardless. The report says
    /// whether the drain completed and how many records never reached
    /// their handlers.
    pub fn shutdown(&self, timeout: Duration) -> Result<ShutdownReport> {
        {
            let mut state = self.state.lock();
            if matches!(*state, LifecycleState::Stopping | LifecycleState::Stopped) {
                return Err(LoggerError::LoggerClosed);
            }
            *state = LifecycleState::Stopping;
        }

        // Disconnecting the channel tells the consumer to exit once the
        // backlog is drained
        let _ = self.sender.lock().take();

        let drained = if self.config.async_mode {
            match self.worker.lock().take() {
                Some(handle) => {
                    let deadline = Instant::now() + timeout;
                    while !handle.is_finished() && Instant::now() < deadline {
                        thread::sleep(DRAIN_POLL_INTERVAL);
                    }
                    if handle.is_finished() {
                        let _ = handle.join();
                        true
                    } else {
                        // Leave the thread behind; the closed dispatcher
                        // makes its remaining work a no-op
                        false
                    }
                }
                // Never started: drain whatever was queued inline
                None => {
                    self.drain_inline();
                    true
                }
            }
        } else {
            true
        };

        {
            let mut dispatcher = self.dispatcher.lock();
            let _ = dispatcher.flush_all();
            dispatcher.close_all();
        }

        *self.state.lock() = LifecycleState::Stopped;

        let undelivered = self.metrics.undelivered();
        if !drained {
            eprintln!(
                "[LOGGER WARNING] Shutdown drain timed out after {:?}; \
                 {} records undelivered",
                timeout, undelivered
            );
        }
        Ok(ShutdownReport {
            drained,
            undelivered,
        })
    }

    fn enqueue(&self, record: LogRecord) -> Result<()> {
        let sender = self.sender.lock();
        let sender = sender.as_ref().ok_or(LoggerError::LoggerClosed)?;

        match sender.try_send(QueueItem::Record(record)) {
            Ok(()) => {
                self.metrics.record_enqueued();
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::LoggerClosed),
            Err(TrySendError::Full(item)) => {
                self.metrics.record_queue_full();
                match self.config.overflow_policy {
                    OverflowPolicy::DropNewest => {
                        self.note_drop();
                        Ok(())
                    }
                    OverflowPolicy::Block => {
                        self.metrics.record_block();
                        sender.send(item).map_err(|_| LoggerError::LoggerClosed)?;
                        self.metrics.record_enqueued();
                        Ok(())
                    }
                    OverflowPolicy::BlockWithTimeout(wait) => {
                        self.metrics.record_block();
                        match sender.send_timeout(item, wait) {
                            Ok(()) => {
                                self.metrics.record_enqueued();
                                Ok(())
                            }
                            Err(crossbeam_channel::SendTimeoutError::Timeout(_)) => {
                                self.note_drop();
                                Ok(())
                            }
                            Err(crossbeam_channel::SendTimeoutError::Disconnected(_)) => {
                                Err(LoggerError::LoggerClosed)
                            }
                        }
                    }
                }
            }
        }
    }

    /// Count a dropped record and raise the periodic stderr alert
    fn note_drop(&self) {
        let total_dropped = self.metrics.record_dropped() + 1;
        if total_dropped == 1 || total_dropped % DROP_ALERT_INTERVAL == 0 {
            eprintln!(
                "[LOGGER WARNING] Log queue full; {} records dropped so far",
                total_dropped
            );
        }

        if let Some(ref on_overflow) = self.config.on_overflow {
            let result = catch_unwind(AssertUnwindSafe(|| on_overflow(total_dropped)));
            if result.is_err() {
                eprintln!("[LOGGER ERROR] Overflow callback panicked");
                self.metrics.record_callback_error();
            }
        }
    }

    /// Dispatch everything sitting in the queue on the current thread.
    /// Used when shutdown runs on a logger whose consumer never started.
    fn drain_inline(&self) {
        let receiver = self.receiver.lock().take();
        if let Some(receiver) = receiver {
            let mut dispatcher = self.dispatcher.lock();
            while let Ok(item) = receiver.try_recv() {
                match item {
                    QueueItem::Record(record) => {
                        dispatcher.dispatch(&record, &self.metrics);
                    }
                    QueueItem::Flush(ack) => {
                        let _ = dispatcher.flush_all();
                        let _ = ack.send(());
                    }
                }
            }
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Best effort drain and close if the user never called shutdown
        if self.is_open() {
            let _ = self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}

/// Consumer thread body: drain the queue until every sender is gone,
/// dispatching records in arrival order
fn consumer_loop(
    receiver: Receiver<QueueItem>,
    dispatcher: Arc<Mutex<Dispatcher>>,
    metrics: Arc<LoggerMetrics>,
) {
    while let Ok(item) = receiver.recv() {
        match item {
            QueueItem::Record(record) => {
                dispatcher.lock().dispatch(&record, &metrics);
            }
            QueueItem::Flush(ack) => {
                let _ = dispatcher.lock().flush_all();
                // The flush caller may have given up waiting
                let _ = ack.send(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::HandlerConfig;
    use std::fs;
    use tempfile::tempdir;

    fn file_logger(path: &std::path::Path, async_mode: bool) -> Logger {
        let config = LoggerConfig::new()
            .with_handler(HandlerConfig::file(path).with_level(LogLevel::Debug))
            .with_async_mode(async_mode);
        Logger::new(config).unwrap()
    }

    #[test]
    fn test_sync_logging_without_start() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sync.log");
        let logger = file_logger(&path, false);

        logger.info("works before start").unwrap();
        logger.flush().unwrap();

        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("works before start"));
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let logger = Logger::new(LoggerConfig::new()).unwrap();
        logger.start().unwrap();
        assert!(matches!(
            logger.start(),
            Err(LoggerError::AlreadyStarted)
        ));
    }

    #[test]
    fn test_log_after_shutdown_is_rejected() {
        let dir = tempdir().unwrap();
        let logger = file_logger(&dir.path().join("closed.log"), false);

        let report = logger.shutdown(Duration::from_secs(1)).unwrap();
        assert!(report.drained);

        assert!(matches!(
            logger.info("too late"),
            Err(LoggerError::LoggerClosed)
        ));
    }

    #[test]
    fn test_shutdown_twice_is_rejected() {
        let logger = Logger::new(LoggerConfig::new()).unwrap();
        logger.shutdown(Duration::from_secs(1)).unwrap();
        assert!(matches!(
            logger.shutdown(Duration::from_secs(1)),
            Err(LoggerError::LoggerClosed)
        ));
    }

    #[test]
    fn test_async_records_before_start_are_delivered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("early.log");
        let logger = file_logger(&path, true);

        logger.info("queued before start").unwrap();
        logger.start().unwrap();
        logger.info("after start").unwrap();

        let report = logger.shutdown(Duration::from_secs(2)).unwrap();
        assert!(report.drained);
        assert_eq!(report.undelivered, 0);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("queued before start"));
        assert!(content.contains("after start"));
    }

    #[test]
    fn test_async_shutdown_without_start_drains_inline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nostart.log");
        let logger = file_logger(&path, true);

        logger.warning("never started").unwrap();
        let report = logger.shutdown(Duration::from_secs(1)).unwrap();
        assert!(report.drained);

        assert!(fs::read_to_string(&path).unwrap().contains("never started"));
    }

    #[test]
    fn test_drop_newest_counts_drops_and_keeps_survivor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drops.log");
        let config = LoggerConfig::new()
            .with_handler(HandlerConfig::file(&path).with_level(LogLevel::Debug))
            .with_async_mode(true)
            .with_queue_capacity(1);
        let logger = Logger::new(config).unwrap();

        // Consumer not started, so the second record must overflow
        logger.info("fits").unwrap();
        logger.info("dropped").unwrap();

        assert_eq!(logger.metrics().dropped_count(), 1);
        assert_eq!(logger.metrics().queue_full_events(), 1);

        // The accepted record still gets delivered
        logger.shutdown(Duration::from_secs(1)).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("fits"));
        assert!(!content.contains("dropped"));
    }

    #[test]
    fn test_shutdown_reports_timed_out_drain() {
        struct SlowHandler;

        impl crate::core::Handler for SlowHandler {
            fn write(&mut self, _record: &LogRecord, _rendered: &str) -> crate::core::Result<()> {
                thread::sleep(Duration::from_millis(50));
                Ok(())
            }
            fn flush(&mut self) -> crate::core::Result<()> {
                Ok(())
            }
            fn close(&mut self) -> crate::core::Result<()> {
                Ok(())
            }
            fn name(&self) -> &str {
                "slow"
            }
        }

        let logger = Logger::new(LoggerConfig::new().with_async_mode(true)).unwrap();
        logger
            .dispatcher
            .lock()
            .push_handler(LogLevel::Debug, None, Box::new(SlowHandler));
        logger.start().unwrap();

        // 20 records at 50ms each cannot drain within 100ms
        for i in 0..20 {
            logger.info(format!("backlog {}", i)).unwrap();
        }
        let report = logger.shutdown(Duration::from_millis(100)).unwrap();

        assert!(!report.drained);
        assert!(report.undelivered > 0);
        assert_eq!(report.undelivered, logger.metrics().undelivered());

        // The logger is fully closed despite the abandoned backlog
        assert!(matches!(
            logger.info("too late"),
            Err(LoggerError::LoggerClosed)
        ));
    }

    #[test]
    fn test_overflow_callback_sees_cumulative_count() {
        use std::sync::atomic::{AtomicU64, Ordering};

        let observed = Arc::new(AtomicU64::new(0));
        let observed_clone = Arc::clone(&observed);

        let config = LoggerConfig::new()
            .with_async_mode(true)
            .with_queue_capacity(1)
            .with_on_overflow(Arc::new(move |count| {
                observed_clone.store(count, Ordering::Relaxed);
            }));
        let logger = Logger::new(config).unwrap();

        logger.info("fits").unwrap();
        logger.info("drop one").unwrap();
        logger.info("drop two").unwrap();

        assert_eq!(observed.load(Ordering::Relaxed), 2);
        logger.shutdown(Duration::from_secs(1)).unwrap();
    }

    #[test]
    fn test_flush_before_start_is_inline() {
        let logger = Logger::new(LoggerConfig::new().with_async_mode(true)).unwrap();
        logger.flush().unwrap();
        logger.shutdown(Duration::from_secs(1)).unwrap();
    }

    #[test]
    fn test_metrics_account_for_every_record() {
        let dir = tempdir().unwrap();
        let logger = file_logger(&dir.path().join("counts.log"), true);
        logger.start().unwrap();

        for i in 0..50 {
            logger.info(format!("record {}", i)).unwrap();
        }
        let report = logger.shutdown(Duration::from_secs(2)).unwrap();

        assert!(report.drained);
        let metrics = logger.metrics();
        assert_eq!(metrics.total_enqueued(), 50);
        assert_eq!(metrics.total_dispatched(), 50);
        assert_eq!(metrics.undelivered(), 0);
    }
}
