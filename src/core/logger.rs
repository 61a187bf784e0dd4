//! Reference backend logger
//!
//! A synchronous, severity-leveled logger that fans entries out to its
//! appenders. Clones and scoped derivations share the minimum level, the
//! appender list and the metrics, so changing the level through any handle
//! is observed by every other handle.

use super::{
    backend::{Appender, Backend, ERROR_KEY},
    error::Result,
    log_context::LogContext,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::RwLock;
use std::any::Any;
use std::error::Error;
use std::sync::Arc;

type SharedAppenders = Arc<RwLock<Vec<Box<dyn Appender>>>>;

#[derive(Clone)]
pub struct Logger {
    min_level: Arc<RwLock<LogLevel>>,
    appenders: SharedAppenders,
    /// Metrics for observability (dropped count, total logged, etc.)
    metrics: Arc<LoggerMetrics>,
    /// Fields pre-attached by `with_fields`
    scope: Arc<LogContext>,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: Arc::new(RwLock::new(LogLevel::Info)),
            appenders: Arc::new(RwLock::new(Vec::new())),
            metrics: Arc::new(LoggerMetrics::new()),
            scope: Arc::new(LogContext::new()),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_logr_adapter::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .appender(MemoryAppender::new())
    ///     .build();
    /// assert_eq!(logger.min_level(), LogLevel::Debug);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    /// Change the minimum level for this logger and every handle sharing it
    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Derive a logger that attaches `fields` (over the current scope) to every entry
    #[must_use]
    pub fn scoped(&self, fields: &LogContext) -> Self {
        let mut scope = (*self.scope).clone();
        scope.merge(fields);
        Self {
            min_level: Arc::clone(&self.min_level),
            appenders: Arc::clone(&self.appenders),
            metrics: Arc::clone(&self.metrics),
            scope: Arc::new(scope),
        }
    }

    /// Fields attached to every entry emitted through this handle
    pub fn scope(&self) -> &LogContext {
        &self.scope
    }

    /// Log with structured context fields
    pub fn log_with_context(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: LogContext,
    ) {
        if level < *self.min_level.read() {
            self.metrics.record_filtered();
            return;
        }

        let mut fields = (*self.scope).clone();
        fields.merge(&context);
        let entry = LogEntry::new(level, message.into()).with_context(fields);
        self.write_entry(&entry);
    }

    /// Write an entry to every appender with per-appender panic isolation
    ///
    /// One failing appender does not prevent the others from receiving the
    /// entry. Returns `true` if any appender failed.
    fn write_entry(&self, entry: &LogEntry) -> bool {
        let mut appenders = self.appenders.write();
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender #{} ({}) failed: {}", idx, appender.name(), e);
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(panic_info.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }

        has_error
    }

    /// Get the number of dropped logs
    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for Logger {
    fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    fn log(&self, level: LogLevel, message: &str, fields: LogContext, error: Option<&dyn Error>) {
        let mut fields = fields;
        if let Some(err) = error {
            fields.add_field(ERROR_KEY, err.to_string());
        }
        self.log_with_context(level, message, fields);
    }

    fn with_fields(&self, fields: LogContext) -> Arc<dyn Backend> {
        Arc::new(self.scoped(&fields))
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_logr_adapter::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .appender(MemoryAppender::new())
///     .build();
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            appenders: Vec::new(),
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Add an appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let logger = Logger::new();
        logger.set_min_level(self.min_level);
        for appender in self.appenders {
            logger.add_appender(appender);
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::{FieldValue, LoggerError};

    #[derive(Debug)]
    struct Boom;

    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "boom")
        }
    }

    impl Error for Boom {}

    #[test]
    fn test_builder_default_level_is_info() {
        let logger = LoggerBuilder::default().build();
        assert_eq!(logger.min_level(), LogLevel::Info);
        assert!(logger.is_enabled_at(LogLevel::Info));
        assert!(!logger.is_enabled_at(LogLevel::Debug));
    }

    #[test]
    fn test_level_shared_between_clones() {
        let logger = Logger::new();
        let clone = logger.clone();
        let scoped = logger.with_fields(LogContext::new().with_field("k", "v"));

        logger.set_min_level(LogLevel::Trace);

        assert_eq!(clone.min_level(), LogLevel::Trace);
        assert_eq!(scoped.min_level(), LogLevel::Trace);
    }

    #[test]
    fn test_filtered_entries_are_counted() {
        let memory = MemoryAppender::new();
        let logger = Logger::builder()
            .min_level(LogLevel::Warn)
            .appender(memory.clone())
            .build();

        Backend::log(&logger, LogLevel::Info, "too quiet", LogContext::new(), None);

        assert!(memory.entries().is_empty());
        assert_eq!(logger.metrics().filtered_count(), 1);
    }

    #[test]
    fn test_scoped_fields_are_overwritten_by_entry_fields() {
        let memory = MemoryAppender::new();
        let logger = Logger::builder().appender(memory.clone()).build();
        let scoped = logger
            .with_fields(LogContext::new().with_field("color", "green").with_field("size", 3));

        scoped.log(
            LogLevel::Info,
            "hello",
            LogContext::new().with_field("color", "blue"),
            None,
        );

        let entries = memory.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field("color"), Some(&FieldValue::from("blue")));
        assert_eq!(entries[0].field("size"), Some(&FieldValue::from(3)));
    }

    #[test]
    fn test_error_stored_under_error_key() {
        let memory = MemoryAppender::new();
        let logger = Logger::builder().appender(memory.clone()).build();

        Backend::log(&logger, LogLevel::Error, "failed", LogContext::new(), Some(&Boom));

        let entries = memory.entries();
        assert_eq!(entries[0].field(ERROR_KEY), Some(&FieldValue::from("boom")));
    }

    #[test]
    fn test_panicking_appender_is_isolated() {
        struct PanickingAppender;

        impl Appender for PanickingAppender {
            fn append(&mut self, _entry: &LogEntry) -> Result<()> {
                panic!("appender exploded");
            }

            fn flush(&mut self) -> Result<()> {
                Ok(())
            }

            fn name(&self) -> &str {
                "panicking"
            }
        }

        let memory = MemoryAppender::new();
        let logger = Logger::builder()
            .appender(PanickingAppender)
            .appender(memory.clone())
            .build();

        logger.log_with_context(LogLevel::Info, "still delivered", LogContext::new());

        assert_eq!(memory.entries().len(), 1);
        assert_eq!(logger.dropped_count(), 1);
    }

    #[test]
    fn test_failing_appender_counts_as_dropped() {
        struct FailingAppender;

        impl Appender for FailingAppender {
            fn append(&mut self, _entry: &LogEntry) -> Result<()> {
                Err(LoggerError::writer("Simulated failure"))
            }

            fn flush(&mut self) -> Result<()> {
                Ok(())
            }

            fn name(&self) -> &str {
                "failing"
            }
        }

        let logger = Logger::builder().appender(FailingAppender).build();
        for _ in 0..5 {
            logger.log_with_context(LogLevel::Error, "Test message", LogContext::new());
        }

        assert_eq!(logger.dropped_count(), 5);
        assert_eq!(logger.metrics().total_logged(), 0);
    }
}
