//! Core data model for sovdev-logger
//!
//! This crate holds the pure, I/O-free half of the library:
//!
//! - **Levels**: the six-level vocabulary and its OpenTelemetry severity
//!   mapping
//! - **Peer services**: frozen friendly-name to system-identifier registry
//! - **Sanitization**: credential redaction and stack scrubbing for
//!   exceptions
//! - **Record**: the canonical structured record every sink projects from
//! - **Configuration**: environment resolution with smart transport
//!   defaults
//! - **Errors**: the two caller-visible precondition errors
//!
//! The emitting half (sinks, OTLP providers, lifecycle) lives in
//! `sovdev-logger-client`; most users depend on the `sovdev-logger` facade
//! crate which re-exports both.

pub mod config;
pub mod error;
pub mod levels;
pub mod peers;
pub mod record;
pub mod sanitize;

// Re-export the most commonly used types for convenience
pub use config::{OtlpSettings, RunConfig};
pub use error::{Error, Result};
pub use levels::LogLevel;
pub use peers::{create_peer_services, PeerRegistry, PeerServices};
pub use record::{generate_trace_id, CallData, LogRecord, LogType, ServiceIdentity, SpanIds};
pub use sanitize::{sanitize_error, SanitizedException};
