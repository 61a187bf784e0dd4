//! Backend contracts
//!
//! [`Backend`] is the severity-leveled sink the key-value front-end forwards
//! to; [`Appender`] is an output destination of the reference [`Logger`].
//!
//! [`Logger`]: super::Logger

use super::{error::Result, log_context::LogContext, log_entry::LogEntry, log_level::LogLevel};
use std::error::Error;
use std::sync::Arc;

/// Field key under which an attached error is stored
pub const ERROR_KEY: &str = "error";

/// A severity-leveled logger accepting a message plus structured fields.
///
/// Implementations own their thread-safety and I/O. The configured minimum
/// level may change at any time and must be read on every query.
pub trait Backend: Send + Sync {
    /// Current minimum enabled severity
    fn min_level(&self) -> LogLevel;

    /// Whether a record at `level` would be emitted
    fn is_enabled_at(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    /// Emit one record.
    ///
    /// Scoped fields are applied first and `fields` overwrite them. A present
    /// `error` is stored under [`ERROR_KEY`].
    fn log(&self, level: LogLevel, message: &str, fields: LogContext, error: Option<&dyn Error>);

    /// Derive a backend that pre-attaches `fields` to every record.
    fn with_fields(&self, fields: LogContext) -> Arc<dyn Backend>;
}

/// Output destination for formatted entries
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
