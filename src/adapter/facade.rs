//! Key-value logger facade
//!
//! [`KvLogger`] is an immutable, cheaply cloned value. Every derivation
//! (`with_name`, `with_values`, `v`, `with_call_depth`) returns a new logger
//! and leaves the original untouched, so one base logger can be shared
//! freely between threads.

use super::caller::{self, CALLER_KEY};
use super::encoder;
use super::name::{LoggerName, NAME_KEY};
use super::value::{FormatFn, Loggable, Value};
use super::verbosity::{self, INFO_SEVERITY};
use crate::core::{Backend, FieldValue, LogContext, LogLevel};
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Leveled, hierarchical key-value logger forwarding to a [`Backend`]
///
/// # Example
///
/// ```
/// use rust_logr_adapter::prelude::*;
/// use rust_logr_adapter::kv;
///
/// let memory = MemoryAppender::new();
/// let backend = Logger::builder().appender(memory.clone()).build();
///
/// let log = KvLogger::new(backend).with_name("main").with_values(&kv!["color", "green"]);
/// log.info("hello, world", &kv!["animal", "walrus"]);
/// log.v(1).info("suppressed at the default level", &kv![]);
///
/// let lines = memory.json_lines();
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0]["logger"], "main");
/// assert_eq!(lines[0]["color"], "green");
/// ```
#[derive(Clone)]
pub struct KvLogger {
    /// Backend scoped with every field added through `with_values`
    sink: Arc<dyn Backend>,
    name: LoggerName,
    verbosity: u32,
    call_depth: usize,
    report_caller: bool,
    formatter: Option<FormatFn>,
}

impl KvLogger {
    /// Facade over `backend` with default options
    pub fn new<B: Backend + 'static>(backend: B) -> Self {
        Self::builder(backend).build()
    }

    pub fn builder<B: Backend + 'static>(backend: B) -> KvLoggerBuilder {
        KvLoggerBuilder::new(Arc::new(backend))
    }

    /// A logger whose name has `segment` appended
    #[must_use]
    pub fn with_name(&self, segment: impl Into<String>) -> Self {
        Self {
            name: self.name.with_segment(segment),
            ..self.clone()
        }
    }

    /// A logger that attaches the encoded `args` to every record
    ///
    /// Same-named fields from earlier calls are overwritten. An odd-length
    /// list is discarded entirely and the fields stay as they were.
    #[must_use]
    pub fn with_values(&self, args: &[Value]) -> Self {
        let fields = encoder::encode(self.formatter.as_ref(), args);
        if fields.is_empty() {
            return self.clone();
        }
        Self {
            sink: self.sink.with_fields(fields),
            ..self.clone()
        }
    }

    /// A logger `level` steps more verbose; negative levels add nothing
    #[must_use]
    pub fn v(&self, level: i32) -> Self {
        Self {
            verbosity: verbosity::accumulate(self.verbosity, level),
            ..self.clone()
        }
    }

    /// A logger attributing records `depth` frames above its direct caller
    ///
    /// The depth replaces any previous one.
    #[must_use]
    pub fn with_call_depth(&self, depth: usize) -> Self {
        Self {
            call_depth: depth,
            ..self.clone()
        }
    }

    /// Whether `info` on this logger would currently emit
    pub fn enabled(&self) -> bool {
        verbosity::enabled(self.sink.as_ref(), self.effective_level())
    }

    /// Severity `info` records are emitted at
    pub fn effective_level(&self) -> LogLevel {
        verbosity::compute_severity(INFO_SEVERITY, self.verbosity)
    }

    /// Emit at the effective level if enabled
    #[track_caller]
    pub fn info(&self, msg: &str, args: &[Value]) {
        if !self.enabled() {
            return;
        }
        self.emit(Location::caller(), self.effective_level(), msg, args, None);
    }

    /// Emit at error level regardless of verbosity
    ///
    /// A present `err` is recorded under the `error` key; an absent one
    /// still emits the rest of the record.
    #[track_caller]
    pub fn error(&self, err: Option<&dyn Error>, msg: &str, args: &[Value]) {
        self.emit(Location::caller(), LogLevel::Error, msg, args, err);
    }

    fn emit(
        &self,
        origin: &Location<'_>,
        level: LogLevel,
        msg: &str,
        args: &[Value],
        err: Option<&dyn Error>,
    ) {
        let mut fields = LogContext::new();
        if let Some(name) = self.name.joined() {
            fields.add_field(NAME_KEY, name);
        }
        if self.report_caller {
            fields.add_field(CALLER_KEY, caller::resolve(origin, self.call_depth).to_string());
        }
        encoder::encode_into(&mut fields, self.formatter.as_ref(), args);

        self.sink.log(level, msg, fields, err);
    }

    pub fn name(&self) -> &LoggerName {
        &self.name
    }

    /// Cumulative `v` offset
    pub fn verbosity(&self) -> u32 {
        self.verbosity
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub fn reports_caller(&self) -> bool {
        self.report_caller
    }

    /// The scoped backend records are forwarded to
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.sink
    }
}

impl fmt::Debug for KvLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvLogger")
            .field("name", &self.name.joined())
            .field("verbosity", &self.verbosity)
            .field("call_depth", &self.call_depth)
            .field("report_caller", &self.report_caller)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Options for constructing a [`KvLogger`]
///
/// # Example
/// ```
/// use rust_logr_adapter::prelude::*;
///
/// let log = KvLogger::builder(Logger::new())
///     .name(["some", "name"])
///     .report_caller(true)
///     .formatter(|value| FieldValue::String(format!("{:?}", value)))
///     .build();
/// assert_eq!(log.name().joined().as_deref(), Some("some.name"));
/// ```
pub struct KvLoggerBuilder {
    backend: Arc<dyn Backend>,
    name: LoggerName,
    formatter: Option<FormatFn>,
    report_caller: bool,
    call_depth: usize,
}

impl KvLoggerBuilder {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            name: LoggerName::new(),
            formatter: None,
            report_caller: false,
            call_depth: 0,
        }
    }

    /// Default name segments
    #[must_use = "builder methods return a new value"]
    pub fn name<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name = segments.into_iter().collect();
        self
    }

    /// Encoder for values with no special handling, replacing JSON text
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F>(mut self, format: F) -> Self
    where
        F: Fn(&dyn Loggable) -> FieldValue + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(format));
        self
    }

    /// Set or clear the fallback encoder
    #[must_use = "builder methods return a new value"]
    pub fn format_fn(mut self, format: Option<FormatFn>) -> Self {
        self.formatter = format;
        self
    }

    /// Attach the `caller` field to every record
    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, enabled: bool) -> Self {
        self.report_caller = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn call_depth(mut self, depth: usize) -> Self {
        self.call_depth = depth;
        self
    }

    pub fn build(self) -> KvLogger {
        KvLogger {
            sink: self.backend,
            name: self.name,
            verbosity: 0,
            call_depth: self.call_depth,
            report_caller: self.report_caller,
            formatter: self.formatter,
        }
    }
}
