//! Operation metrics
//!
//! Four fixed instruments updated on every logging call:
//!
//! - **sovdev_operations_total**: operations logged (counter)
//! - **sovdev_errors_total**: error-class operations (counter)
//! - **sovdev_operation_duration**: per-call latency in ms (histogram)
//! - **sovdev_operations_active**: calls currently in flight (up-down counter)
//!
//! Every instrument carries the snake_case label set `service_name`,
//! `service_version`, `peer_service`, `log_level`, `log_type`; the error
//! counter additionally carries `exception_type`.
//!
//! The active counter is balanced through [`ActiveOperation`], an RAII
//! guard acquired at dispatch entry. Its `Drop` records the duration and
//! decrements the active count, so the balance holds on every exit path,
//! including panicking sinks.

use opentelemetry::{
    metrics::{Counter, Histogram, Meter, UpDownCounter},
    KeyValue,
};
use sovdev_logger_core::{LogLevel, LogType};
use std::time::Instant;

/// The fixed instrument set for operation telemetry
pub struct SovdevMetrics {
    operations_total: Counter<u64>,
    errors_total: Counter<u64>,
    operation_duration: Histogram<f64>,
    operations_active: UpDownCounter<i64>,
}

impl SovdevMetrics {
    /// Create the instruments on a meter
    ///
    /// With no meter provider installed the instruments are no-ops, so the
    /// recording code path is identical whether or not a metrics endpoint
    /// is configured.
    pub fn new(meter: &Meter) -> Self {
        Self {
            operations_total: meter
                .u64_counter("sovdev_operations_total")
                .with_unit("1")
                .with_description("Total number of operations logged")
                .build(),
            errors_total: meter
                .u64_counter("sovdev_errors_total")
                .with_unit("1")
                .with_description("Total number of error-class operations logged")
                .build(),
            operation_duration: meter
                .f64_histogram("sovdev_operation_duration")
                .with_unit("ms")
                .with_description("Duration of logging operations in milliseconds")
                .build(),
            operations_active: meter
                .i64_up_down_counter("sovdev_operations_active")
                .with_unit("1")
                .with_description("Number of logging operations currently in flight")
                .build(),
        }
    }

    /// Begin an operation: active +1, total +1, guard returned
    ///
    /// Dropping the guard records the elapsed duration and performs the
    /// balancing active -1.
    pub fn begin_operation(&self, labels: Vec<KeyValue>) -> ActiveOperation<'_> {
        self.operations_active.add(1, &labels);
        self.operations_total.add(1, &labels);
        ActiveOperation {
            metrics: self,
            labels,
            started: Instant::now(),
        }
    }

    /// Count one error-class operation
    pub fn record_error(&self, labels: &[KeyValue], exception_type: &str) {
        let mut error_labels = labels.to_vec();
        error_labels.push(KeyValue::new("exception_type", exception_type.to_string()));
        self.errors_total.add(1, &error_labels);
    }
}

/// Build the common label set for one call
pub fn operation_labels(
    service_name: &str,
    service_version: &str,
    peer_service: &str,
    level: LogLevel,
    log_type: LogType,
) -> Vec<KeyValue> {
    vec![
        KeyValue::new("service_name", service_name.to_string()),
        KeyValue::new("service_version", service_version.to_string()),
        KeyValue::new("peer_service", peer_service.to_string()),
        KeyValue::new("log_level", level.as_str()),
        KeyValue::new("log_type", log_type.as_str()),
    ]
}

/// Guard tracking one in-flight operation
///
/// Created by [`SovdevMetrics::begin_operation`]; must stay alive until
/// after the sinks have run so the recorded duration covers the full call.
pub struct ActiveOperation<'a> {
    metrics: &'a SovdevMetrics,
    labels: Vec<KeyValue>,
    started: Instant,
}

impl Drop for ActiveOperation<'_> {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.metrics
            .operation_duration
            .record(elapsed_ms, &self.labels);
        self.metrics.operations_active.add(-1, &self.labels);
    }
}
