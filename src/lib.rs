//! sovdev-logger - Structured telemetry client
//!
//! This is the main convenience crate that re-exports the sovdev-logger
//! sub-crates. Use this crate for a single dependency providing the full
//! logging API.
//!
//! The library implements the "Loggeloven av 2025" governance standard:
//! every call produces one canonical structured record, fanned out to the
//! configured sinks (stderr console, rotating files, OTLP/HTTP logs), a
//! per-call span, and a fixed set of operation metrics.
//!
//! # Architecture
//!
//! - **sovdev-logger-core**: canonical record model, levels, peer-service
//!   registry, exception sanitization, run configuration, error taxonomy
//! - **sovdev-logger-client**: sink fan-out, OTLP providers, per-call
//!   spans, metric instruments, session lifecycle
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use sovdev_logger::{
//!     create_peer_services, initialize, log, log_with, flush,
//!     LogLevel, LogOptions, PeerServices,
//! };
//!
//! fn main() -> sovdev_logger::Result<()> {
//!     let peers = create_peer_services(HashMap::from([
//!         ("BRREG".to_string(), "SYS1234567".to_string()),
//!     ]));
//!     initialize("company-lookup", Some("1.0.0"), Some(peers.mappings().clone()))?;
//!
//!     log(LogLevel::Info, "main", "Service started", PeerServices::INTERNAL)?;
//!     log_with(
//!         LogLevel::Info,
//!         "lookup",
//!         "Looking up company 971277882",
//!         "BRREG",
//!         LogOptions::new().with_input(serde_json::json!({
//!             "organisasjonsnummer": "971277882",
//!         })),
//!     )?;
//!
//!     flush();
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! Transports are selected from the environment at `initialize` time:
//! `LOG_TO_CONSOLE`, `LOG_TO_FILE`, `LOG_FILE_PATH`, `LOG_FILE_MAX_BYTES`,
//! `LOG_FILE_BACKUP_COUNT` and the standard `OTEL_EXPORTER_OTLP_*` family.
//! With no OTLP endpoint configured the console sink is enabled by
//! default, so a bare local run prints records on stderr.

// Re-export all public APIs from sub-crates
pub use sovdev_logger_client as client;
pub use sovdev_logger_core as core;

// Convenience re-exports of the most commonly used items
pub use sovdev_logger_client::{
    flush, flush_with_timeout, generate_trace_id, initialize, is_initialized, log,
    log_job_progress, log_job_status, log_with, session_id, LogOptions,
};
pub use sovdev_logger_core::{
    create_peer_services, Error, LogLevel, LogType, PeerServices, Result, RunConfig,
};

#[doc(hidden)]
pub use sovdev_logger_client::reset;
