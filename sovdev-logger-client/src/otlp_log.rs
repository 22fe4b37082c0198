//! OTLP log emission
//!
//! Projects the canonical record onto an OpenTelemetry log record. The body
//! carries the human message; every other canonical field travels as a flat
//! snake_case attribute, matching what the backend validators accept.
//! camelCase aliases are never emitted.
//!
//! `input_json` and `response_json` are JSON-encoded strings on this sink
//! (the file and console sinks carry them as structured JSON instead).
//! `response_json` is always present, the literal string `null` when the
//! caller supplied nothing.

use opentelemetry::logs::{AnyValue, LogRecord as _, Logger as _, Severity};
use opentelemetry::Key;
use opentelemetry_sdk::logs::SdkLogger;
use sovdev_logger_core::{LogLevel, LogRecord};
use std::time::{SystemTime, UNIX_EPOCH};

/// Map a level onto the OTel severity enum
fn severity(level: LogLevel) -> Severity {
    match level {
        LogLevel::Trace => Severity::Trace,
        LogLevel::Debug => Severity::Debug,
        LogLevel::Info => Severity::Info,
        LogLevel::Warn => Severity::Warn,
        LogLevel::Error => Severity::Error,
        LogLevel::Fatal => Severity::Fatal,
    }
}

/// Emit one canonical record through the OTLP log pipeline
pub fn emit_record(logger: &SdkLogger, record: &LogRecord) {
    let now = SystemTime::now();
    let observed_nanos = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos().to_string())
        .unwrap_or_else(|_| "0".to_string());

    let mut log_record = logger.create_log_record();
    log_record.set_timestamp(now);
    log_record.set_observed_timestamp(now);
    log_record.set_severity_number(severity(record.level));
    log_record.set_severity_text(record.level.as_str());
    log_record.set_body(AnyValue::from(record.message.clone()));

    let mut add = |key: &'static str, value: String| {
        log_record.add_attribute(Key::from_static_str(key), value);
    };

    add("service_name", record.service_name.clone());
    add("service_version", record.service_version.clone());
    add("session_id", record.session_id.clone());
    add("trace_id", record.trace_id.clone());
    add("event_id", record.event_id.clone());
    add("function_name", record.function_name.clone());
    add("peer_service", record.peer_service.clone());
    add("log_type", record.log_type.as_str().to_string());
    add("timestamp", record.timestamp.clone());
    add("severity_text", record.level.as_str().to_string());
    add("observed_timestamp", observed_nanos);

    if let Some(input) = &record.input_json {
        add(
            "input_json",
            serde_json::to_string(input).unwrap_or_else(|_| "null".to_string()),
        );
    }
    add(
        "response_json",
        match &record.response_json {
            Some(response) => {
                serde_json::to_string(response).unwrap_or_else(|_| "null".to_string())
            }
            None => "null".to_string(),
        },
    );

    if let Some(exception_type) = &record.exception_type {
        add("exception_type", exception_type.clone());
    }
    if let Some(exception_message) = &record.exception_message {
        add("exception_message", exception_message.clone());
    }
    if let Some(exception_stacktrace) = &record.exception_stacktrace {
        add("exception_stacktrace", exception_stacktrace.clone());
    }

    log_record.add_attribute(
        Key::from_static_str("severity_number"),
        record.level.severity() as i64,
    );

    logger.emit(log_record);
}
