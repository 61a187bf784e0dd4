//! # Rust logr Adapter
//!
//! A leveled, hierarchical key-value logging front-end mapped onto a
//! severity-leveled backend.
//!
//! ## Features
//!
//! - **Additive Verbosity**: `v(n)` steps records from info towards trace
//! - **Structured Fields**: typed, lazily-resolvable and custom-marshaled values
//! - **Hierarchical Names**: dotted logger names attached to every record
//! - **Caller Attribution**: optional `file:line` with adjustable call depth
//! - **Pluggable Backend**: any [`Backend`] implementation; [`Logger`] ships
//!   with console, file and in-memory appenders
//!
//! ## Example
//!
//! ```
//! use rust_logr_adapter::prelude::*;
//! use rust_logr_adapter::kv;
//!
//! let memory = MemoryAppender::new();
//! let backend = Logger::builder().appender(memory.clone()).build();
//! let log = KvLogger::builder(backend).report_caller(true).build();
//!
//! log.with_name("worker").info("started", &kv!["jobs", 4]);
//!
//! let line = &memory.json_lines()[0];
//! assert_eq!(line["jobs"], 4);
//! assert_eq!(line["logger"], "worker");
//! ```

pub mod adapter;
pub mod appenders;
pub mod core;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    pub use crate::appenders::{FileAppender, MemoryAppender};
    pub use crate::adapter::{
        Attr, AttrValue, FormatFn, KvLogger, KvLoggerBuilder, LogValuer, Loggable, Marshaler,
        Value,
    };
    pub use crate::core::{
        Appender, Backend, FieldValue, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, OutputFormat, Result, TimestampFormat,
    };
}

pub use adapter::{
    Attr, AttrValue, CallerInfo, FormatFn, KvLogger, KvLoggerBuilder, LogValuer, Loggable,
    LoggerName, Marshaler, Value,
};
#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
pub use appenders::{FileAppender, MemoryAppender};
pub use core::{
    Appender, Backend, FieldValue, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder,
    LoggerError, LoggerMetrics, OutputFormat, Result, TimestampFormat,
};
