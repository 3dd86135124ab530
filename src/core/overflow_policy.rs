//! Overflow policies for the async logging queue
//!
//! When the bounded queue is full, the policy determines what happens to
//! the record being enqueued. Dropping is always counted in metrics.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::log_record::LogRecord;

/// Policy for handling queue overflow in async mode
///
/// # Example
///
/// ```
/// use fastlog::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: drop the new record and count it
/// let policy = OverflowPolicy::default();
///
/// // Wait up to 100ms for space, then drop
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the new record, increment the dropped counter, never block
    /// the caller. The safe default for latency-sensitive callers.
    #[default]
    DropNewest,

    /// Block until space is available
    ///
    /// Warning: this propagates backpressure into the application. Only
    /// use when log preservation matters more than latency.
    Block,

    /// Block with timeout, then drop
    ///
    /// Attempts to wait for space, dropping the record if the timeout
    /// expires.
    BlockWithTimeout(Duration),
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
        }
    }
}

/// Callback invoked after a record has been dispatched to all handlers
pub type RecordCallback = Arc<dyn Fn(&LogRecord) + Send + Sync>;

/// Callback for overflow notifications, given the cumulative dropped count
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::DropNewest);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::Block.to_string(), "Block");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "BlockWithTimeout(100ms)"
        );
    }
}
