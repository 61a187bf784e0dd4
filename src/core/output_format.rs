//! Output format configuration for log entries
//!
//! Provides different output formats for log entries:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format, groups as nested objects
//! - Logfmt: Key-value format, groups flattened with dotted keys

use super::log_context::FieldValue;
use super::log_entry::LogEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const TIMESTAMP_KEY: &str = "timestamp";
const LEVEL_KEY: &str = "level";
const MESSAGE_KEY: &str = "message";

/// Timestamp rendering for formatted entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    UnixSeconds,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Any strftime-compatible format string
    Custom(String),

    /// Leave the timestamp out of the output entirely
    Omit,
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>`; `None` for [`TimestampFormat::Omit`]
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> Option<String> {
        match self {
            TimestampFormat::Iso8601 => {
                Some(datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
            }
            TimestampFormat::Iso8601Micros => {
                Some(datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
            }
            TimestampFormat::Rfc3339 => Some(datetime.to_rfc3339()),
            TimestampFormat::UnixSeconds => Some(datetime.timestamp().to_string()),
            TimestampFormat::UnixMillis => Some(datetime.timestamp_millis().to_string()),
            TimestampFormat::UnixMicros => Some(datetime.timestamp_micros().to_string()),
            TimestampFormat::Custom(format_str) => {
                // An invalid format string falls back to RFC 3339
                let mut out = String::new();
                match write!(out, "{}", datetime.format(format_str)) {
                    Ok(()) => Some(out),
                    Err(_) => Some(datetime.to_rfc3339()),
                }
            }
            TimestampFormat::Omit => None,
        }
    }
}

/// Output format for log entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] main - Request processed user=alice`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"level":"INFO","message":"Request processed","timestamp":"2025-01-08T10:30:45.123Z"}`
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=INFO message="Request processed"`
    Logfmt,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => self.format_text(entry, timestamp_format),
            OutputFormat::Json => self.format_json(entry, timestamp_format),
            OutputFormat::Logfmt => self.format_logfmt(entry, timestamp_format),
        }
    }

    fn format_text(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let thread_name = entry.thread_name.as_ref().unwrap_or(&entry.thread_id);

        let mut out = String::new();
        if let Some(ts) = timestamp_format.format(&entry.timestamp) {
            out.push_str(&format!("[{}] ", ts));
        }
        out.push_str(&format!(
            "[{:5}] {} - {}",
            entry.level.to_str(),
            thread_name,
            entry.message
        ));

        if let Some(ref context) = entry.context {
            out.push(' ');
            out.push_str(&context.format_fields());
        }

        out
    }

    /// Fields whose key collides with a reserved key are stored as `fields.<key>`
    fn format_json(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut json_obj = serde_json::Map::new();

        if let Some(ref context) = entry.context {
            for (key, value) in context.fields() {
                let key = match key.as_str() {
                    TIMESTAMP_KEY | LEVEL_KEY | MESSAGE_KEY => format!("fields.{}", key),
                    _ => key.clone(),
                };
                json_obj.insert(key, value.to_json_value());
            }
        }

        if let Some(ts) = timestamp_format.format(&entry.timestamp) {
            let ts_value = match timestamp_format {
                TimestampFormat::UnixSeconds => {
                    serde_json::Value::Number(entry.timestamp.timestamp().into())
                }
                TimestampFormat::UnixMillis => {
                    serde_json::Value::Number(entry.timestamp.timestamp_millis().into())
                }
                TimestampFormat::UnixMicros => {
                    serde_json::Value::Number(entry.timestamp.timestamp_micros().into())
                }
                _ => serde_json::Value::String(ts),
            };
            json_obj.insert(TIMESTAMP_KEY.to_string(), ts_value);
        }
        json_obj.insert(
            LEVEL_KEY.to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            MESSAGE_KEY.to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }

    fn format_logfmt(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut parts = Vec::new();

        if let Some(ts) = timestamp_format.format(&entry.timestamp) {
            parts.push(format!("{}={}", TIMESTAMP_KEY, escape_logfmt_value(&ts)));
        }
        parts.push(format!("{}={}", LEVEL_KEY, entry.level.to_str()));
        // Message is always quoted
        parts.push(format!("{}={}", MESSAGE_KEY, quote_logfmt_value(&entry.message)));

        if let Some(ref context) = entry.context {
            context.for_each_leaf(|key, value| {
                let formatted_value = match value {
                    FieldValue::String(s) => escape_logfmt_value(s),
                    other => escape_logfmt_value(&other.to_string()),
                };
                parts.push(format!("{}={}", escape_logfmt_key(key), formatted_value));
            });
        }

        parts.join(" ")
    }
}

/// Keep only characters that are safe in a logfmt key
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Quote a logfmt value if it is empty or contains spaces, quotes or `=`
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=']) {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
