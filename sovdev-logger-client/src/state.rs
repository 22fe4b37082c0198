//! Process-wide logger state
//!
//! One [`LoggerState`] exists per initialized process: the session id, the
//! resolved configuration, the peer registry, the three providers and the
//! instrument set. `initialize` installs a fresh state (replacing any prior
//! one), `flush` takes it out for ordered shutdown, and the hidden test
//! reset drops it without the flush protocol.
//!
//! Reads are lock-free in spirit: the state is an `Arc` snapshot taken once
//! per call, so a concurrent re-initialization never tears an in-flight
//! dispatch.

use crate::file_sink::FileSink;
use crate::metrics::SovdevMetrics;
use opentelemetry_sdk::logs::{SdkLogger, SdkLoggerProvider};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};
use sovdev_logger_core::{Error, PeerRegistry, Result, RunConfig, ServiceIdentity};
use std::sync::{Arc, RwLock};

static STATE: RwLock<Option<Arc<LoggerState>>> = RwLock::new(None);

/// Everything a dispatch needs, bound at initialization
pub struct LoggerState {
    pub identity: ServiceIdentity,
    pub config: RunConfig,
    pub registry: PeerRegistry,
    pub tracer_provider: Option<SdkTracerProvider>,
    pub meter_provider: Option<SdkMeterProvider>,
    pub logger_provider: Option<SdkLoggerProvider>,
    pub tracer: Option<SdkTracer>,
    pub otlp_logger: Option<SdkLogger>,
    pub metrics: SovdevMetrics,
    pub file_sink: Option<FileSink>,
}

/// Install a new state, replacing any prior one
pub fn install(state: LoggerState) {
    *write_lock() = Some(Arc::new(state));
}

/// Snapshot the current state, failing when uninitialized
pub fn current() -> Result<Arc<LoggerState>> {
    read_lock().clone().ok_or(Error::Uninitialized)
}

/// Take the state out for shutdown, leaving the process uninitialized
pub fn take() -> Option<Arc<LoggerState>> {
    write_lock().take()
}

/// Whether `initialize` has installed a state
pub fn is_initialized() -> bool {
    read_lock().is_some()
}

/// Session id of the current state, if initialized
pub fn session_id() -> Option<String> {
    read_lock().as_ref().map(|s| s.identity.session_id.clone())
}

/// Drop the state without the flush protocol. Test hook only.
#[doc(hidden)]
pub fn reset() {
    *write_lock() = None;
}

fn read_lock() -> std::sync::RwLockReadGuard<'static, Option<Arc<LoggerState>>> {
    match STATE.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_lock() -> std::sync::RwLockWriteGuard<'static, Option<Arc<LoggerState>>> {
    match STATE.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
