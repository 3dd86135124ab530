//! Logger metrics for observability
//!
//! Counters for queue health and handler failures. `undelivered()` is the
//! number of records accepted into the queue that have not (yet) been
//! dispatched, which shutdown reports after a drain timeout.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use fastlog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.total_enqueued(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted into the queue (or dispatched inline in sync mode)
    total_enqueued: AtomicU64,

    /// Records fully processed by the dispatcher
    total_dispatched: AtomicU64,

    /// Records dropped due to queue overflow
    dropped_count: AtomicU64,

    /// Times the queue was found full at enqueue
    queue_full_events: AtomicU64,

    /// Times a producer blocked waiting for queue space
    block_events: AtomicU64,

    /// Individual handler write/flush failures (isolated, not fatal)
    handler_errors: AtomicU64,

    /// User callback failures (isolated, not fatal)
    callback_errors: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_enqueued: AtomicU64::new(0),
            total_dispatched: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            handler_errors: AtomicU64::new(0),
            callback_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_enqueued(&self) -> u64 {
        self.total_enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_dispatched(&self) -> u64 {
        self.total_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_errors(&self) -> u64 {
        self.handler_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn callback_errors(&self) -> u64 {
        self.callback_errors.load(Ordering::Relaxed)
    }

    /// Records accepted but not yet dispatched
    pub fn undelivered(&self) -> u64 {
        self.total_enqueued().saturating_sub(self.total_dispatched())
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.total_enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.total_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a dropped record, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_error(&self) -> u64 {
        self.handler_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_callback_error(&self) -> u64 {
        self.callback_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been logged.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_enqueued() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_enqueued.store(0, Ordering::Relaxed);
        self.total_dispatched.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.handler_errors.store(0, Ordering::Relaxed);
        self.callback_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_enqueued: AtomicU64::new(self.total_enqueued()),
            total_dispatched: AtomicU64::new(self.total_dispatched()),
            dropped_count: AtomicU64::new(self.dropped_count()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
            handler_errors: AtomicU64::new(self.handler_errors()),
            callback_errors: AtomicU64::new(self.callback_errors()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.total_enqueued(), 0);
        assert_eq!(metrics.undelivered(), 0);
    }

    #[test]
    fn test_undelivered_tracking() {
        let metrics = LoggerMetrics::new();
        for _ in 0..5 {
            metrics.record_enqueued();
        }
        metrics.record_dispatched();
        metrics.record_dispatched();
        assert_eq!(metrics.undelivered(), 3);
    }

    #[test]
    fn test_metrics_drop_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_enqueued();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "Drop rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_dropped();
        metrics.record_enqueued();
        metrics.record_handler_error();

        metrics.reset();

        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.total_enqueued(), 0);
        assert_eq!(metrics.handler_errors(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_dropped();

        let snapshot = metrics.clone();
        metrics.record_dropped();

        assert_eq!(metrics.dropped_count(), 2);
        assert_eq!(snapshot.dropped_count(), 1);
    }
}
