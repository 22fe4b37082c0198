//! Per-call spans
//!
//! Callers never create spans themselves. The dispatcher opens one
//! INTERNAL span around each logging call, parented on whatever context is
//! current, and the record builder fuses the span's trace/span ids into
//! the canonical record. The span ends right after the sink fan-out, with
//! ERROR status for error-class records.

use opentelemetry::trace::{Span, SpanBuilder, SpanKind, Status, Tracer};
use opentelemetry::{Context, KeyValue};
use sovdev_logger_core::{LogLevel, LogType, SanitizedException, SpanIds};

/// One in-flight call span together with its wire identifiers
pub struct CallSpan {
    span: opentelemetry_sdk::trace::Span,
    /// Ids the record builder stamps on the canonical record
    pub ids: SpanIds,
}

/// Start the span for one logging call
///
/// The span is named after the instrumented function and parented on the
/// current context, so an ambient span from the surrounding application
/// keeps its trace id flowing through the records.
pub fn start_call_span(
    tracer: &opentelemetry_sdk::trace::SdkTracer,
    function_name: &str,
    level: LogLevel,
    log_type: LogType,
    peer_service: &str,
    service_name: &str,
) -> CallSpan {
    let builder = SpanBuilder::from_name(function_name.to_string())
        .with_kind(SpanKind::Internal)
        .with_attributes(vec![
            KeyValue::new("service_name", service_name.to_string()),
            KeyValue::new("peer_service", peer_service.to_string()),
            KeyValue::new("function_name", function_name.to_string()),
            KeyValue::new("log_type", log_type.as_str()),
            KeyValue::new("log_level", level.as_str()),
        ]);

    let span = tracer.build_with_context(builder, &Context::current());
    let context = span.span_context();
    let ids = SpanIds {
        trace_id: context.trace_id().to_string(),
        span_id: context.span_id().to_string(),
    };

    CallSpan { span, ids }
}

impl CallSpan {
    /// Close the span, installing status from the record outcome
    ///
    /// Error-class calls get ERROR status and an exception event carrying
    /// the sanitized triple; everything else ends OK.
    pub fn finish(mut self, level: LogLevel, exception: Option<&SanitizedException>) {
        let error_class = level.is_error_class() || exception.is_some();

        if error_class {
            let description = exception
                .map(|e| e.message.clone())
                .unwrap_or_else(|| level.as_str().to_string());
            self.span.set_status(Status::error(description));

            if let Some(e) = exception {
                self.span.add_event(
                    "exception",
                    vec![
                        KeyValue::new("exception.type", e.exception_type.clone()),
                        KeyValue::new("exception.message", e.message.clone()),
                        KeyValue::new("exception.stacktrace", e.stack.clone()),
                    ],
                );
            }
        } else {
            self.span.set_status(Status::Ok);
        }

        self.span.end();
    }
}
