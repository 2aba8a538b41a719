//! Progress and failure reporting
//!
//! The fetcher never logs through a global; it is handed a [`Reporter`].
//! `info` carries progress messages, `fatal` is called once with the error
//! that aborts the run, after which the fetcher returns that error.

use crate::error::Error;
use crate::types::LogLevel;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use tracing::{error, info};

/// Sink for fetch progress and fatal failures
pub trait Reporter: Send + Sync {
    /// Report a progress message
    fn info(&self, message: &str);

    /// Report the failure that aborts the current run
    fn fatal(&self, message: &str, error: &Error);
}

/// Reporter that forwards to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn fatal(&self, message: &str, error: &Error) {
        error!(error = %error, "{message}");
    }
}

/// A recorded reporter message
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Message level
    pub level: LogLevel,
    /// Message text (fatal entries include the error)
    pub message: String,
    /// When the message was reported
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Check if this is a fatal entry
    pub fn is_fatal(&self) -> bool {
        self.level == LogLevel::Fatal
    }
}

/// Reporter that keeps every message in memory
#[derive(Debug, Default)]
pub struct BufferedReporter {
    entries: Mutex<Vec<LogEntry>>,
}

impl BufferedReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Messages of the info entries, in order
    pub fn info_messages(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| e.level == LogLevel::Info)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Number of fatal entries
    pub fn fatal_count(&self) -> usize {
        self.lock().iter().filter(|e| e.is_fatal()).count()
    }

    fn push(&self, entry: LogEntry) {
        self.lock().push(entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        // A poisoned buffer still holds every entry pushed before the panic
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Reporter for BufferedReporter {
    fn info(&self, message: &str) {
        self.push(LogEntry::new(LogLevel::Info, message));
    }

    fn fatal(&self, message: &str, error: &Error) {
        self.push(LogEntry::new(LogLevel::Fatal, format!("{message}: {error}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_reporter_records_in_order() {
        let reporter = BufferedReporter::new();
        reporter.info("first");
        reporter.info("second");
        reporter.fatal("Failed to fetch data", &Error::http_status(502, "bad gateway"));

        let entries = reporter.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(reporter.info_messages(), vec!["first", "second"]);
        assert_eq!(reporter.fatal_count(), 1);
        assert!(entries[2].is_fatal());
        assert_eq!(
            entries[2].message,
            "Failed to fetch data: HTTP 502: bad gateway"
        );
        assert!(entries[0].timestamp <= entries[2].timestamp);
    }

    #[test]
    fn test_tracing_reporter_is_usable_as_trait_object() {
        let reporter: &dyn Reporter = &TracingReporter;
        reporter.info("hello");
        reporter.fatal("boom", &Error::config("bad"));
    }
}
