//! Emitting half of sovdev-logger
//!
//! This crate turns canonical records (built by `sovdev-logger-core`) into
//! observable signals:
//!
//! - **Sinks**: stderr console, rotating `dev.log`/`error.log` files, and
//!   an OTLP/HTTP log pipeline with flat snake_case attributes
//! - **Traces**: one INTERNAL span per call, fused into the record's
//!   trace/span ids
//! - **Metrics**: the four `sovdev_*` instruments with CUMULATIVE
//!   temporality
//! - **Lifecycle**: one-shot initialization, process-wide session state,
//!   and a bounded, idempotent flush-then-shutdown
//!
//! Most users depend on the `sovdev-logger` facade crate, which re-exports
//! this crate's API together with the core types.

pub mod console;
pub mod file_sink;
pub mod logger;
pub mod metrics;
pub mod otlp_log;
pub mod providers;
pub mod span;
pub mod state;

// Re-export the public API surface
pub use file_sink::FileSink;
pub use logger::{
    flush, flush_with_timeout, generate_trace_id, initialize, is_initialized, log,
    log_job_progress, log_job_status, log_with, session_id, LogOptions,
};
pub use metrics::SovdevMetrics;

#[doc(hidden)]
pub use logger::reset;
