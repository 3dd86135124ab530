//! HTTP handler for remote log delivery
//!
//! POSTs each record to a remote endpoint. The wire contract is always
//! the JSON rendering of the record, regardless of the display format
//! configured for the handler. Every attempt has a bounded timeout and
//! failures retry a small fixed number of times with doubling backoff,
//! so a dead endpoint can never stall the dispatch loop indefinitely.

use std::thread;
use std::time::Duration;

use crate::core::error::{LoggerError, Result};
use crate::core::{Handler, LogFormat, LogRecord, TimestampFormat};

/// Per-attempt request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Total delivery attempts per record
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Backoff before the second attempt; doubles per retry
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(50);

pub struct HttpHandler {
    endpoint: String,
    timeout: Duration,
    max_attempts: u32,
    retry_backoff: Duration,
    timestamp_format: TimestampFormat,
    /// Built lazily on first write so construction never does IO
    client: Option<reqwest::blocking::Client>,
    name: String,
}

impl HttpHandler {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let name = format!("http:{}", endpoint);
        Self {
            endpoint,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            timestamp_format: TimestampFormat::default(),
            client: None,
            name,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn ensure_client(&mut self) -> Result<&reqwest::blocking::Client> {
        if self.client.is_none() {
            let client = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| {
                    LoggerError::http_delivery(
                        &self.endpoint,
                        format!("Failed to build HTTP client: {}", e),
                    )
                })?;
            self.client = Some(client);
        }
        Ok(self.client.as_ref().expect("client just initialized"))
    }
}

impl Handler for HttpHandler {
    fn write(&mut self, record: &LogRecord, _rendered: &str) -> Result<()> {
        // The wire format is always structured
        let body = LogFormat::Json.render(record, &self.timestamp_format);

        let endpoint = self.endpoint.clone();
        let max_attempts = self.max_attempts;
        let backoff = self.retry_backoff;
        let client = self.ensure_client()?;

        let mut last_error = String::new();
        for attempt in 0..max_attempts {
            if attempt > 0 {
                thread::sleep(backoff * 2u32.pow(attempt - 1));
            }

            let result = client
                .post(&endpoint)
                .header("Content-Type", "application/json")
                .body(body.clone())
                .send();

            match result {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => {
                    last_error = format!("server returned {}", response.status());
                }
                Err(e) => {
                    last_error = e.to_string();
                }
            }
        }

        Err(LoggerError::http_delivery(
            &endpoint,
            format!("{} attempts failed, last error: {}", max_attempts, last_error),
        ))
    }

    fn flush(&mut self) -> Result<()> {
        // Each write is delivered synchronously; nothing is buffered
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.client = None;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
