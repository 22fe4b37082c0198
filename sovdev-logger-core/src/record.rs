//! Canonical log record
//!
//! One [`LogRecord`] is produced per API call and every sink projects from
//! it. The struct field order is the wire order of the flat snake_case JSON
//! shape written to the console and file sinks; the OTLP emitter maps the
//! same fields onto log-record attributes.
//!
//! Building a record is pure: given the service identity, the call data,
//! and the active span ids (if any), the only non-determinism is the clock
//! and the freshly allocated `event_id`.

use crate::levels::LogLevel;
use crate::sanitize::SanitizedException;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// The three record categories, mutually exclusive per record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogType {
    /// A regular request/response style operation
    #[serde(rename = "transaction")]
    Transaction,
    /// A batch job lifecycle event (started, completed, failed)
    #[serde(rename = "job.status")]
    JobStatus,
    /// Per-item progress inside a batch job
    #[serde(rename = "job.progress")]
    JobProgress,
}

impl LogType {
    /// Wire form of the log type
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Transaction => "transaction",
            LogType::JobStatus => "job.status",
            LogType::JobProgress => "job.progress",
        }
    }
}

/// Immutable service identity stamped on every record
#[derive(Debug, Clone)]
pub struct ServiceIdentity {
    /// Service name from initialization
    pub service_name: String,
    /// Service version from initialization
    pub service_version: String,
    /// Session id, one UUIDv4 per process lifetime
    pub session_id: String,
}

/// Trace/span identifiers of the span active at record build time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanIds {
    /// 32-hex lowercase trace id
    pub trace_id: String,
    /// 16-hex lowercase span id
    pub span_id: String,
}

/// Caller-supplied portion of a record, after peer resolution and
/// exception sanitization
#[derive(Debug, Clone)]
pub struct CallData {
    pub level: LogLevel,
    pub function_name: String,
    pub message: String,
    /// Already resolved to the system identifier
    pub peer_service: String,
    pub log_type: LogType,
    pub input: Option<Value>,
    pub response: Option<Value>,
    pub exception: Option<SanitizedException>,
    /// Externally supplied correlation id, used only when no span is active
    pub trace_id: Option<String>,
}

/// The canonical structured record, serialized as one JSON line
///
/// `span_id` and the exception fields are omitted when absent;
/// `input_json` and `response_json` are always present and `null` when the
/// caller supplied nothing.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub service_name: String,
    pub service_version: String,
    pub session_id: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    pub event_id: String,
    pub function_name: String,
    pub message: String,
    pub peer_service: String,
    pub log_type: LogType,
    pub input_json: Option<Value>,
    pub response_json: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_stacktrace: Option<String>,
}

impl LogRecord {
    /// Project a call into the canonical record
    ///
    /// Trace id precedence: active span, then the caller's `trace_id`, then
    /// a fresh UUIDv4 with dashes stripped. `span_id` is present only when
    /// a span is active.
    pub fn build(identity: &ServiceIdentity, call: CallData, span: Option<&SpanIds>) -> LogRecord {
        let (trace_id, span_id) = match span {
            Some(ids) => (ids.trace_id.clone(), Some(ids.span_id.clone())),
            None => (
                call.trace_id.unwrap_or_else(generate_trace_id),
                None,
            ),
        };

        let (exception_type, exception_message, exception_stacktrace) = match call.exception {
            Some(e) => (Some(e.exception_type), Some(e.message), Some(e.stack)),
            None => (None, None, None),
        };

        LogRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, false),
            level: call.level,
            service_name: identity.service_name.clone(),
            service_version: identity.service_version.clone(),
            session_id: identity.session_id.clone(),
            trace_id,
            span_id,
            event_id: Uuid::new_v4().to_string(),
            function_name: call.function_name,
            message: call.message,
            peer_service: call.peer_service,
            log_type: call.log_type,
            input_json: call.input,
            response_json: call.response,
            exception_type,
            exception_message,
            exception_stacktrace,
        }
    }

    /// Whether this record belongs to the error class
    ///
    /// True for ERROR/FATAL levels and for any record carrying an
    /// exception, independent of level.
    pub fn is_error_class(&self) -> bool {
        self.level.is_error_class() || self.exception_type.is_some()
    }

    /// Serialize to the single-line JSON wire form
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Generate a 32-hex lowercase trace id (UUIDv4 with dashes stripped)
///
/// Syntactically indistinguishable from an OpenTelemetry trace id; used by
/// callers that correlate records across function boundaries without
/// opening a span.
pub fn generate_trace_id() -> String {
    Uuid::new_v4().simple().to_string()
}
