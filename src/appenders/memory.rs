//! In-memory appender
//!
//! Captures entries and their formatted lines in a buffer shared by every
//! clone, so a handle kept by the caller can inspect what a logger emitted.

use crate::core::{Appender, LogEntry, OutputFormat, Result, TimestampFormat};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Captured {
    entries: Vec<LogEntry>,
    lines: Vec<String>,
}

#[derive(Clone)]
pub struct MemoryAppender {
    buffer: Arc<Mutex<Captured>>,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
}

impl MemoryAppender {
    /// JSON lines without timestamps
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Captured::default())),
            output_format: OutputFormat::Json,
            timestamp_format: TimestampFormat::Omit,
        }
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Snapshot of captured entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.buffer.lock().entries.clone()
    }

    /// Snapshot of captured formatted lines
    pub fn lines(&self) -> Vec<String> {
        self.buffer.lock().lines.clone()
    }

    /// Captured lines parsed as JSON; lines that are not JSON are skipped
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.buffer
            .lock()
            .lines
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().entries.is_empty()
    }

    pub fn clear(&self) {
        let mut buffer = self.buffer.lock();
        buffer.entries.clear();
        buffer.lines.clear();
    }
}

impl Default for MemoryAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let line = self.output_format.format(entry, &self.timestamp_format);
        let mut buffer = self.buffer.lock();
        buffer.entries.push(entry.clone());
        buffer.lines.push(line);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
