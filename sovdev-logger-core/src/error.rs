//! Error types for sovdev-logger
//!
//! The library distinguishes two kinds of failure:
//!
//! - **Hard failures**: precondition violations surfaced to the caller
//!   (`InvalidConfiguration`, `Uninitialized`). These are the only errors a
//!   caller ever sees.
//! - **Soft failures**: everything downstream of a successful dispatch
//!   (sink I/O, exporter errors, malformed environment values). These are
//!   reported on the process error stream and swallowed, because logging
//!   must never break application flow.
//!
//! # Examples
//!
//! ```rust
//! use sovdev_logger_core::{Error, Result};
//!
//! fn check(name: &str) -> Result<()> {
//!     if name.trim().is_empty() {
//!         return Err(Error::InvalidConfiguration(
//!             "service name must not be empty".into(),
//!         ));
//!     }
//!     Ok(())
//! }
//! assert!(check("  ").is_err());
//! ```

use thiserror::Error;

/// Result type for sovdev-logger operations
///
/// Convenience alias used throughout the workspace crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-visible error type for sovdev-logger operations
///
/// Only precondition violations reach the caller. Sink and exporter
/// failures are diagnosed on stderr and never propagate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Initialization was attempted with unusable input
    ///
    /// Currently raised for an empty or whitespace-only service name.
    /// Aborts initialization; no process state is installed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A log operation was invoked before `initialize`
    ///
    /// The logging functions need the process-wide session (providers,
    /// session id, peer registry) that only `initialize` creates.
    #[error("Logger not initialized: call initialize() before logging")]
    Uninitialized,
}
