//! Integration tests for the adapter over the reference backend
//!
//! These tests verify:
//! - Log injection prevention
//! - Error tracking
//! - Structured fields in every output format
//! - Timestamp format support
//! - Multiple appenders

use rust_logr_adapter::appenders::{FileAppender, MemoryAppender};
use rust_logr_adapter::core::{Backend, LogLevel, Logger, LoggerError};
use rust_logr_adapter::{kv, Attr, AttrValue, KvLogger, OutputFormat, TimestampFormat, Value};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn file_logger(appender: FileAppender) -> (Logger, KvLogger) {
    let backend = Logger::builder().appender(appender).build();
    let log = KvLogger::new(backend.clone());
    (backend, log)
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");

    let appender = FileAppender::new(&log_file).expect("Failed to create appender");
    let (backend, log) = file_logger(appender);

    // Try to inject fake log entries with newlines
    let malicious_message = "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation";
    log.info(malicious_message, &kv![]);

    backend.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.contains("\\n"));

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1, "Log should be a single line, not multiple");
}

#[test]
fn test_error_tracking() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("errors.jsonl");

    let appender = FileAppender::json(&log_file).expect("Failed to create appender");
    let (backend, log) = file_logger(appender);

    let failure = LoggerError::writer("disk full");
    log.with_name("store")
        .error(Some(&failure), "write failed", &kv!["attempt", 3]);
    backend.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let json: serde_json::Value = serde_json::from_str(content.trim()).expect("Invalid JSON");

    assert_eq!(json["level"], "ERROR");
    assert_eq!(json["message"], "write failed");
    assert_eq!(json["error"], "Writer error: disk full");
    assert_eq!(json["logger"], "store");
    assert_eq!(json["attempt"], 3);
    assert_eq!(backend.metrics().total_logged(), 1);
}

#[test]
fn test_structured_fields_in_text_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("structured.log");

    let appender = FileAppender::new(&log_file)
        .expect("Failed to create appender")
        .with_timestamp_format(TimestampFormat::Omit);
    let (backend, log) = file_logger(appender);

    log.with_values(&kv!["user", "alice"]).info(
        "request processed",
        &kv![
            "status",
            200,
            "elapsed",
            AttrValue::Duration(Duration::from_millis(1500))
        ],
    );
    backend.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.starts_with("[INFO ]"), "got {}", content);
    assert!(content.contains("request processed"));
    assert!(content.contains("elapsed=1.5s"));
    assert!(content.contains("status=200"));
    assert!(content.contains("user=alice"));
}

#[test]
fn test_groups_in_logfmt_and_json() {
    let logfmt = MemoryAppender::new().with_output_format(OutputFormat::Logfmt);
    let json = MemoryAppender::new();
    let backend = Logger::builder()
        .appender(logfmt.clone())
        .appender(json.clone())
        .build();
    let log = KvLogger::new(backend);

    let request = AttrValue::group([
        Attr::string("method", "GET"),
        Attr::group("peer", [Attr::string("addr", "10.0.0.1"), Attr::uint("port", 443)]),
    ]);
    log.info("served", &kv!["request", request]);

    assert_eq!(
        logfmt.lines(),
        vec!["level=INFO message=\"served\" request.method=GET request.peer.addr=10.0.0.1 request.peer.port=443"]
    );

    let record = &json.json_lines()[0];
    assert_eq!(record["request"]["method"], "GET");
    assert_eq!(record["request"]["peer"]["port"], 443);
}

#[test]
fn test_reserved_json_keys_are_prefixed() {
    let memory = MemoryAppender::new();
    let backend = Logger::builder().appender(memory.clone()).build();
    let log = KvLogger::new(backend);

    log.info("real message", &kv!["message", "shadow", "level", "fake"]);

    let record = &memory.json_lines()[0];
    assert_eq!(record["message"], "real message");
    assert_eq!(record["level"], "INFO");
    assert_eq!(record["fields.message"], "shadow");
    assert_eq!(record["fields.level"], "fake");
}

#[test]
fn test_log_levels() {
    let memory = MemoryAppender::new();
    let backend = Logger::builder()
        .min_level(LogLevel::Warn)
        .appender(memory.clone())
        .build();
    let log = KvLogger::new(backend.clone());

    log.info("filtered", &kv![]);
    log.v(1).info("filtered", &kv![]);
    log.error(None, "kept", &kv![]);

    let entries = memory.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Error);
    // v(1) is short-circuited by the facade and never reaches the backend
    assert_eq!(backend.metrics().filtered_count(), 0);
    assert!(!backend.is_enabled_at(LogLevel::Info));
}

#[test]
fn test_multiple_appenders() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file1 = temp_dir.path().join("multi1.log");
    let log_file2 = temp_dir.path().join("multi2.jsonl");

    let backend = Logger::builder()
        .appender(FileAppender::new(&log_file1).expect("Failed to create appender"))
        .appender(FileAppender::json(&log_file2).expect("Failed to create appender"))
        .build();
    let log = KvLogger::new(backend.clone());

    log.info("Test message", &kv!["animal", "walrus"]);
    backend.flush().expect("Failed to flush");

    let content1 = fs::read_to_string(&log_file1).expect("Failed to read log file 1");
    let content2 = fs::read_to_string(&log_file2).expect("Failed to read log file 2");

    assert!(content1.contains("Test message") && content1.contains("animal=walrus"));
    let json: serde_json::Value = serde_json::from_str(content2.trim()).expect("Invalid JSON");
    assert_eq!(json["animal"], "walrus");
}

#[test]
fn test_file_appender_appends_across_instances() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("append.log");

    for round in 0..2 {
        let appender = FileAppender::new(&log_file).expect("Failed to create appender");
        let (backend, log) = file_logger(appender);
        log.info("round", &kv!["n", round]);
        backend.flush().expect("Failed to flush");
    }

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn test_file_appender_open_failure() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing").join("dir").join("app.log");

    let err = match FileAppender::new(&missing) {
        Ok(_) => panic!("opening under a missing directory should fail"),
        Err(err) => err,
    };
    assert!(err.to_string().contains("opening log file"), "got {}", err);
}

#[test]
fn test_timestamp_format_iso8601() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("timestamp_iso8601.log");

    let appender = FileAppender::new(&log_file)
        .expect("Failed to create appender")
        .with_timestamp_format(TimestampFormat::Iso8601);
    let (backend, log) = file_logger(appender);

    log.info("Test ISO 8601 format", &kv![]);
    backend.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let timestamp_str = content
        .split('[')
        .nth(1)
        .and_then(|s| s.split(']').next())
        .expect("Failed to extract timestamp");

    // ISO 8601 format: 2025-01-08T10:30:45.123Z
    assert!(timestamp_str.contains('T'), "Should contain 'T' separator");
    assert!(timestamp_str.ends_with('Z'), "Should end with 'Z' for UTC");
}

#[test]
fn test_timestamp_format_custom() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("timestamp_custom.log");

    let appender = FileAppender::new(&log_file)
        .expect("Failed to create appender")
        .with_timestamp_format(TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string()));
    let (backend, log) = file_logger(appender);

    log.info("Test custom format", &kv![]);
    backend.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let timestamp_str = content
        .split('[')
        .nth(1)
        .and_then(|s| s.split(']').next())
        .expect("Failed to extract timestamp");

    assert!(timestamp_str.contains('/'), "Should contain date separators in timestamp");
    assert!(!timestamp_str.contains('T'), "Timestamp should not have ISO 8601 'T' separator");
}

#[test]
fn test_json_unix_timestamp() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("timestamp_json_unix.jsonl");

    let appender = FileAppender::json(&log_file)
        .expect("Failed to create appender")
        .with_timestamp_format(TimestampFormat::UnixMillis);
    let (backend, log) = file_logger(appender);

    log.info("Test JSON Unix timestamp", &kv!["list", Value::any(vec![1, 2, 3])]);
    backend.flush().expect("Failed to flush");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let json: serde_json::Value = serde_json::from_str(content.trim()).expect("Invalid JSON");

    // Timestamp should be a number for Unix millis
    let timestamp = json["timestamp"].as_i64().expect("Timestamp should be a number");
    assert!(timestamp > 1_000_000_000_000, "Should be Unix millis (13+ digits)");
    assert_eq!(json["list"], "[1,2,3]");
}
