//! The filtering/formatting/writing engine
//!
//! One dispatcher instance owns every handler. In sync mode the calling
//! thread runs it inline under a lock; in async mode the single consumer
//! thread owns it, so a handler is never invoked from two threads.
//!
//! Per-handler failure isolation: each write is wrapped in `catch_unwind`
//! so one failing or panicking handler cannot disturb the others or kill
//! the consumer loop. Failures go to stderr and the error counters.

use std::panic::{catch_unwind, AssertUnwindSafe};

use super::config::{HandlerConfig, HandlerType, LoggerConfig};
use super::error::{LoggerError, Result};
use super::format::LogFormat;
use super::handler::Handler;
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::metrics::LoggerMetrics;
use super::overflow_policy::RecordCallback;
use super::timestamp::TimestampFormat;
use crate::handlers::{
    ConsoleHandler, HttpHandler, RotatingFileHandler, TimedRotatingFileHandler,
};

/// One configured output: filter settings plus the handler they guard
pub(crate) struct HandlerSlot {
    level: LogLevel,
    format: LogFormat,
    timestamp_format: TimestampFormat,
    keyword_filters: Option<Vec<String>>,
    handler: Box<dyn Handler>,
}

impl HandlerSlot {
    fn from_config(config: &HandlerConfig) -> Result<HandlerSlot> {
        let handler: Box<dyn Handler> = match config.handler_type {
            HandlerType::Console => Box::new(ConsoleHandler::new()),
            HandlerType::File => {
                let filename = config.filename.clone().ok_or_else(|| {
                    LoggerError::config("file handler", "filename is required")
                })?;
                Box::new(RotatingFileHandler::new(
                    filename,
                    config.rotate_size,
                    config.rotate_count,
                ))
            }
            HandlerType::TimedFile => {
                let filename = config.filename.clone().ok_or_else(|| {
                    LoggerError::config("timed file handler", "filename is required")
                })?;
                let interval = config.rotate_interval.ok_or_else(|| {
                    LoggerError::config("timed file handler", "rotation interval is required")
                })?;
                Box::new(TimedRotatingFileHandler::new(
                    filename,
                    interval,
                    config.rotate_count,
                ))
            }
            HandlerType::Custom => {
                let endpoint = config.endpoint.clone().ok_or_else(|| {
                    LoggerError::config("custom handler", "endpoint is required")
                })?;
                Box::new(
                    HttpHandler::new(endpoint)
                        .with_timestamp_format(config.timestamp_format.clone()),
                )
            }
        };

        Ok(HandlerSlot {
            level: config.level,
            format: config.format,
            timestamp_format: config.timestamp_format.clone(),
            keyword_filters: config.keyword_filters.clone(),
            handler,
        })
    }

    /// Level threshold plus optional keyword filter, independent per handler
    fn accepts(&self, record: &LogRecord) -> bool {
        if record.level < self.level {
            return false;
        }
        match self.keyword_filters {
            Some(ref keywords) => keywords
                .iter()
                .any(|keyword| record.message.contains(keyword.as_str())),
            None => true,
        }
    }
}

pub(crate) struct Dispatcher {
    slots: Vec<HandlerSlot>,
    callback: Option<RecordCallback>,
    closed: bool,
}

impl Dispatcher {
    /// Build all handlers from a validated configuration.
    ///
    /// Handler construction never performs IO; files and connections open
    /// lazily on first write.
    pub(crate) fn from_config(config: &LoggerConfig) -> Result<Dispatcher> {
        let slots = config
            .handlers
            .iter()
            .map(HandlerSlot::from_config)
            .collect::<Result<Vec<_>>>()?;
        Ok(Dispatcher {
            slots,
            callback: config.callback.clone(),
            closed: false,
        })
    }

    /// Dispatch one record to every accepting handler, in configuration
    /// order, then invoke the callback once. Failures are isolated.
    pub(crate) fn dispatch(&mut self, record: &LogRecord, metrics: &LoggerMetrics) {
        // A record that races with a forced shutdown is silently skipped;
        // handlers must never be written to after close
        if self.closed {
            return;
        }

        for slot in &mut self.slots {
            if !slot.accepts(record) {
                continue;
            }

            let rendered = slot.format.render(record, &slot.timestamp_format);
            let handler = &mut slot.handler;
            let write_result = catch_unwind(AssertUnwindSafe(|| handler.write(record, &rendered)));

            match write_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Handler '{}' failed: {}", handler.name(), e);
                    metrics.record_handler_error();
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Handler '{}' panicked: {}. \
                         Other handlers continue to function.",
                        handler.name(),
                        panic_message(panic_info)
                    );
                    metrics.record_handler_error();
                }
            }
        }

        if let Some(ref callback) = self.callback {
            let callback_result = catch_unwind(AssertUnwindSafe(|| callback(record)));
            if let Err(panic_info) = callback_result {
                eprintln!(
                    "[LOGGER ERROR] Callback failed: {}",
                    panic_message(panic_info)
                );
                metrics.record_callback_error();
            }
        }

        metrics.record_dispatched();
    }

    /// Flush every handler, isolating individual failures
    pub(crate) fn flush_all(&mut self) -> Result<()> {
        for slot in &mut self.slots {
            let handler = &mut slot.handler;
            let flush_result = catch_unwind(AssertUnwindSafe(|| handler.flush()));
            match flush_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Handler '{}' flush failed: {}",
                        handler.name(),
                        e
                    );
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Handler '{}' panicked during flush: {}",
                        handler.name(),
                        panic_message(panic_info)
                    );
                }
            }
        }
        Ok(())
    }

    /// Close every handler exactly once; later calls are no-ops.
    ///
    /// Close failures are reported and do not stop the remaining handlers
    /// from closing, so no resource outlives shutdown.
    pub(crate) fn close_all(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        for slot in &mut self.slots {
            let handler = &mut slot.handler;
            let close_result = catch_unwind(AssertUnwindSafe(|| handler.close()));
            match close_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Handler '{}' close failed: {}",
                        handler.name(),
                        e
                    );
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Handler '{}' panicked during close: {}",
                        handler.name(),
                        panic_message(panic_info)
                    );
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn push_handler(
        &mut self,
        level: LogLevel,
        keyword_filters: Option<Vec<String>>,
        handler: Box<dyn Handler>,
    ) {
        self.slots.push(HandlerSlot {
            level,
            format: LogFormat::Plain,
            timestamp_format: TimestampFormat::default(),
            keyword_filters,
            handler,
        });
    }
}

fn panic_message(panic_info: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Records every accepted message for assertions
    struct RecordingHandler {
        messages: Arc<parking_lot::Mutex<Vec<String>>>,
    }

    impl Handler for RecordingHandler {
        fn write(&mut self, record: &LogRecord, _rendered: &str) -> Result<()> {
            self.messages.lock().push(record.message.clone());
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn close(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "recording"
        }
    }

    struct FailingHandler;

    impl Handler for FailingHandler {
        fn write(&mut self, _record: &LogRecord, _rendered: &str) -> Result<()> {
            Err(crate::core::error::LoggerError::handler(
                "failing",
                "simulated failure",
            ))
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn close(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    fn empty_dispatcher() -> Dispatcher {
        Dispatcher {
            slots: Vec::new(),
            callback: None,
            closed: false,
        }
    }

    #[test]
    fn test_level_filter_applied_per_handler() {
        let accepted = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut dispatcher = empty_dispatcher();
        dispatcher.push_handler(
            LogLevel::Warning,
            None,
            Box::new(RecordingHandler {
                messages: Arc::clone(&accepted),
            }),
        );

        let metrics = LoggerMetrics::new();
        dispatcher.dispatch(&LogRecord::new(LogLevel::Info, "skip".into()), &metrics);
        dispatcher.dispatch(&LogRecord::new(LogLevel::Error, "keep".into()), &metrics);

        assert_eq!(*accepted.lock(), vec!["keep".to_string()]);
        assert_eq!(metrics.total_dispatched(), 2);
    }

    #[test]
    fn test_keyword_filter_drops_non_matching() {
        let accepted = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut dispatcher = empty_dispatcher();
        dispatcher.push_handler(
            LogLevel::Debug,
            Some(vec!["alert".to_string(), "important".to_string()]),
            Box::new(RecordingHandler {
                messages: Arc::clone(&accepted),
            }),
        );

        let metrics = LoggerMetrics::new();
        dispatcher.dispatch(
            &LogRecord::new(LogLevel::Info, "routine event".into()),
            &metrics,
        );
        dispatcher.dispatch(
            &LogRecord::new(LogLevel::Info, "an important message".into()),
            &metrics,
        );

        assert_eq!(*accepted.lock(), vec!["an important message".to_string()]);
    }

    #[test]
    fn test_failing_handler_does_not_block_others() {
        let accepted = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut dispatcher = empty_dispatcher();
        dispatcher.push_handler(LogLevel::Debug, None, Box::new(FailingHandler));
        dispatcher.push_handler(
            LogLevel::Debug,
            None,
            Box::new(RecordingHandler {
                messages: Arc::clone(&accepted),
            }),
        );

        let metrics = LoggerMetrics::new();
        dispatcher.dispatch(&LogRecord::new(LogLevel::Info, "survives".into()), &metrics);

        assert_eq!(*accepted.lock(), vec!["survives".to_string()]);
        assert_eq!(metrics.handler_errors(), 1);
    }

    #[test]
    fn test_callback_invoked_after_handlers() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let mut dispatcher = empty_dispatcher();
        dispatcher.callback = Some(Arc::new(move |_record: &LogRecord| {
            count_clone.fetch_add(1, Ordering::Relaxed);
        }));

        let metrics = LoggerMetrics::new();
        dispatcher.dispatch(&LogRecord::new(LogLevel::Info, "x".into()), &metrics);
        dispatcher.dispatch(&LogRecord::new(LogLevel::Debug, "y".into()), &metrics);

        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_panicking_callback_is_isolated() {
        let mut dispatcher = empty_dispatcher();
        dispatcher.callback = Some(Arc::new(|_record: &LogRecord| {
            panic!("callback exploded");
        }));

        let metrics = LoggerMetrics::new();
        dispatcher.dispatch(&LogRecord::new(LogLevel::Info, "x".into()), &metrics);

        assert_eq!(metrics.callback_errors(), 1);
        assert_eq!(metrics.total_dispatched(), 1);
    }

    #[test]
    fn test_close_all_is_idempotent() {
        struct CountingClose {
            closes: Arc<AtomicUsize>,
        }
        impl Handler for CountingClose {
            fn write(&mut self, _r: &LogRecord, _s: &str) -> Result<()> {
                Ok(())
            }
            fn flush(&mut self) -> Result<()> {
                Ok(())
            }
            fn close(&mut self) -> Result<()> {
                self.closes.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            fn name(&self) -> &str {
                "counting"
            }
        }

        let closes = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = empty_dispatcher();
        dispatcher.push_handler(
            LogLevel::Debug,
            None,
            Box::new(CountingClose {
                closes: Arc::clone(&closes),
            }),
        );

        dispatcher.close_all();
        dispatcher.close_all();
        assert_eq!(closes.load(Ordering::Relaxed), 1);
    }
}
