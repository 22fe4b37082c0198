//! Public logging façade and sink fan-out
//!
//! The module is the handle: `initialize` binds the process-wide session,
//! the `log*` functions dispatch records, `flush` drains and shuts down the
//! export pipelines. No stateful object is exposed to callers.
//!
//! # Dispatch sequence
//!
//! For every call: acquire the active-operations guard (+1 active,
//! +1 total), count the error class if applicable, open the call span,
//! build the canonical record, fan out to console, file and OTLP log
//! sinks, end the span, then let the guard record the duration and
//! balance the active count. Sinks are independent: a failing sink is
//! diagnosed on stderr and never blocks the others or the caller.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use sovdev_logger_client as sovdev;
//! use sovdev_logger_core::{create_peer_services, LogLevel, PeerServices};
//!
//! fn main() -> sovdev_logger_core::Result<()> {
//!     let peers = create_peer_services(HashMap::from([
//!         ("BRREG".to_string(), "SYS1234567".to_string()),
//!     ]));
//!     sovdev::initialize("my-service", Some("1.0.0"), Some(peers.mappings().clone()))?;
//!
//!     sovdev::log(LogLevel::Info, "main", "Service started", PeerServices::INTERNAL)?;
//!     sovdev::log_job_status(
//!         LogLevel::Info, "main", "DataImportBatch", "Started",
//!         PeerServices::INTERNAL, None, None,
//!     )?;
//!
//!     sovdev::flush();
//!     Ok(())
//! }
//! ```

use crate::file_sink::FileSink;
use crate::metrics::{operation_labels, SovdevMetrics};
use crate::{console, otlp_log, providers, span, state};
use opentelemetry::logs::LoggerProvider as _;
use opentelemetry::metrics::MeterProvider as _;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::InstrumentationScope;
use serde_json::{json, Value};
use sovdev_logger_core::config::{self, RunConfig};
use sovdev_logger_core::record::{CallData, LogRecord};
use sovdev_logger_core::sanitize::sanitize_error;
use sovdev_logger_core::{Error, LogLevel, LogType, PeerRegistry, Result, ServiceIdentity};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Default deadline for [`flush`]
const FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// Optional per-call data for [`log_with`]
///
/// Fluent setters in the builder idiom; everything defaults to absent.
#[derive(Default)]
pub struct LogOptions<'a> {
    input: Option<Value>,
    response: Option<Value>,
    exception: Option<&'a (dyn std::error::Error + 'a)>,
    trace_id: Option<&'a str>,
}

impl<'a> LogOptions<'a> {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the caller's input structure, passed through as JSON
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Attach the caller's response structure, passed through as JSON
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    /// Attach a native error; it is sanitized before leaving the process
    pub fn with_exception(mut self, exception: &'a (dyn std::error::Error + 'a)) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Correlate this record with an externally generated trace id
    ///
    /// Only used when no span is active; see [`generate_trace_id`].
    pub fn with_trace_id(mut self, trace_id: &'a str) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

/// Initialize the process-wide logging session
///
/// Builds the run configuration from the environment, generates the
/// session id, constructs the OTLP providers for every configured signal
/// and installs everything as process state. Calling it again replaces the
/// prior session wholesale.
///
/// # Arguments
///
/// * `service_name` - Name stamped on every record; trimmed, must be non-empty
/// * `service_version` - Explicit version, else `SERVICE_VERSION` env, else `1.0.0`
/// * `peer_mapping` - Friendly peer name to system identifier mapping
///
/// # Errors
///
/// `Error::InvalidConfiguration` when the service name is empty or
/// whitespace. Exporter problems never fail initialization; they are
/// diagnosed on stderr and the affected pipeline stays absent.
pub fn initialize(
    service_name: &str,
    service_version: Option<&str>,
    peer_mapping: Option<HashMap<String, String>>,
) -> Result<()> {
    let service_name = service_name.trim();
    if service_name.is_empty() {
        return Err(Error::InvalidConfiguration(
            "service name must not be empty".to_string(),
        ));
    }

    let service_version = service_version
        .map(str::to_string)
        .or_else(config::service_version_from_env)
        .unwrap_or_else(|| "1.0.0".to_string());

    let run_config = RunConfig::from_env();
    let registry = PeerRegistry::new(peer_mapping.unwrap_or_default(), service_name);
    let identity = ServiceIdentity {
        service_name: service_name.to_string(),
        service_version,
        session_id: Uuid::new_v4().to_string(),
    };

    let resource = providers::build_resource(&identity, &run_config.environment);
    let built = providers::init_providers(&resource, &run_config.otlp);

    let meter = match &built.meter {
        Some(provider) => provider.meter_with_scope(
            InstrumentationScope::builder(identity.service_name.clone()).build(),
        ),
        None => opentelemetry::global::meter_with_scope(
            InstrumentationScope::builder(identity.service_name.clone()).build(),
        ),
    };
    let metrics = SovdevMetrics::new(&meter);

    let tracer = built
        .tracer
        .as_ref()
        .map(|provider| provider.tracer(identity.service_name.clone()));

    let otlp_logger = built.logger.as_ref().map(|provider| {
        provider.logger_with_scope(
            InstrumentationScope::builder(identity.service_name.clone())
                .with_version("1.0.0")
                .build(),
        )
    });

    let file_sink = run_config.file_enabled.then(|| {
        FileSink::new(
            run_config.file_dir.clone(),
            run_config.file_max_bytes,
            run_config.file_backups,
        )
    });

    state::install(state::LoggerState {
        identity,
        config: run_config,
        registry,
        tracer_provider: built.tracer,
        meter_provider: built.meter,
        logger_provider: built.logger,
        tracer,
        otlp_logger,
        metrics,
        file_sink,
    });

    Ok(())
}

/// Record a transaction log
///
/// Shorthand for [`log_with`] without optional data.
pub fn log(level: LogLevel, function_name: &str, message: &str, peer_service: &str) -> Result<()> {
    log_with(level, function_name, message, peer_service, LogOptions::new())
}

/// Record a transaction log with optional input, response, exception and
/// trace correlation
///
/// # Errors
///
/// `Error::Uninitialized` before [`initialize`]. Sink failures never
/// propagate.
pub fn log_with(
    level: LogLevel,
    function_name: &str,
    message: &str,
    peer_service: &str,
    options: LogOptions<'_>,
) -> Result<()> {
    dispatch(
        level,
        function_name,
        message.to_string(),
        Some(peer_service),
        LogType::Transaction,
        options.input,
        options.response,
        options.exception,
        options.trace_id,
    )
}

/// Record a batch job lifecycle event
///
/// The message literal is `Job <status>: <job_name>` and the input merges
/// `job_name`/`job_status` with `extra_input`.
pub fn log_job_status(
    level: LogLevel,
    function_name: &str,
    job_name: &str,
    status: &str,
    peer_service: &str,
    extra_input: Option<Value>,
    trace_id: Option<&str>,
) -> Result<()> {
    let message = format!("Job {status}: {job_name}");
    let input = merge_input(
        json!({
            "job_name": job_name,
            "job_status": status,
        }),
        extra_input,
    );

    dispatch(
        level,
        function_name,
        message,
        Some(peer_service),
        LogType::JobStatus,
        Some(input),
        None,
        None,
        trace_id,
    )
}

/// Record per-item progress inside a batch job
///
/// The message literal is `Processing <item_id> (<current>/<total>)` and
/// the input carries `item_id`, `current_item`, `total_items` and the
/// rounded `progress_percentage`, merged with `extra_input`.
pub fn log_job_progress(
    level: LogLevel,
    function_name: &str,
    item_id: &str,
    current: u64,
    total: u64,
    peer_service: &str,
    extra_input: Option<Value>,
    trace_id: Option<&str>,
) -> Result<()> {
    let message = format!("Processing {item_id} ({current}/{total})");
    let progress_percentage = if total == 0 {
        0
    } else {
        ((current as f64 / total as f64) * 100.0).round() as i64
    };
    let input = merge_input(
        json!({
            "item_id": item_id,
            "current_item": current,
            "total_items": total,
            "progress_percentage": progress_percentage,
        }),
        extra_input,
    );

    dispatch(
        level,
        function_name,
        message,
        Some(peer_service),
        LogType::JobProgress,
        Some(input),
        None,
        None,
        trace_id,
    )
}

/// Flush and shut down the export pipelines with the default 30 s deadline
pub fn flush() {
    flush_with_timeout(FLUSH_TIMEOUT);
}

/// Flush and shut down the export pipelines
///
/// Ordered `force_flush` on the tracer, meter and logger providers,
/// followed by ordered `shutdown` on the same. Each step reports its own
/// failure on stderr and never blocks the others. Once the deadline
/// passes, the remaining steps are skipped and reported. Safe to call
/// repeatedly and before initialization; the process is uninitialized
/// afterwards.
pub fn flush_with_timeout(timeout: Duration) {
    let state = match state::take() {
        Some(state) => state,
        None => {
            eprintln!("Sovdev Logger flush called before initialization; nothing to do");
            return;
        }
    };

    let deadline = Instant::now() + timeout;
    let expired = |label: &str| {
        if Instant::now() >= deadline {
            eprintln!("Sovdev Logger flush deadline exceeded; skipping {label}");
            true
        } else {
            false
        }
    };

    if let Some(provider) = &state.tracer_provider {
        if !expired("tracer flush") {
            if let Err(e) = provider.force_flush() {
                eprintln!("Sovdev Logger failed to flush tracer provider: {e}");
            }
        }
    }
    if let Some(provider) = &state.meter_provider {
        if !expired("meter flush") {
            if let Err(e) = provider.force_flush() {
                eprintln!("Sovdev Logger failed to flush meter provider: {e}");
            }
        }
    }
    if let Some(provider) = &state.logger_provider {
        if !expired("logger flush") {
            if let Err(e) = provider.force_flush() {
                eprintln!("Sovdev Logger failed to flush logger provider: {e}");
            }
        }
    }

    if let Some(provider) = &state.tracer_provider {
        if !expired("tracer shutdown") {
            if let Err(e) = provider.shutdown() {
                eprintln!("Sovdev Logger failed to shut down tracer provider: {e}");
            }
        }
    }
    if let Some(provider) = &state.meter_provider {
        if !expired("meter shutdown") {
            if let Err(e) = provider.shutdown() {
                eprintln!("Sovdev Logger failed to shut down meter provider: {e}");
            }
        }
    }
    if let Some(provider) = &state.logger_provider {
        if !expired("logger shutdown") {
            if let Err(e) = provider.shutdown() {
                eprintln!("Sovdev Logger failed to shut down logger provider: {e}");
            }
        }
    }
}

/// Generate a 32-hex lowercase trace id for cross-call correlation
pub fn generate_trace_id() -> String {
    sovdev_logger_core::generate_trace_id()
}

/// Whether `initialize` has been called in this process
pub fn is_initialized() -> bool {
    state::is_initialized()
}

/// Session id of the current process session, if initialized
pub fn session_id() -> Option<String> {
    state::session_id()
}

/// Drop process state without the flush protocol. Test hook only.
#[doc(hidden)]
pub fn reset() {
    state::reset();
}

/// Merge caller-supplied extra input into a base object
///
/// Object entries merge key-by-key (extra wins); any non-object extra is
/// kept whole under an `extra` key.
fn merge_input(base: Value, extra: Option<Value>) -> Value {
    let mut merged = base;
    match extra {
        None => merged,
        Some(Value::Object(entries)) => {
            if let Value::Object(target) = &mut merged {
                for (key, value) in entries {
                    target.insert(key, value);
                }
            }
            merged
        }
        Some(other) => {
            if let Value::Object(target) = &mut merged {
                target.insert("extra".to_string(), other);
            }
            merged
        }
    }
}

/// The single fan-out path every public `log*` function funnels into
#[allow(clippy::too_many_arguments)]
fn dispatch(
    level: LogLevel,
    function_name: &str,
    message: String,
    peer_service: Option<&str>,
    log_type: LogType,
    input: Option<Value>,
    response: Option<Value>,
    exception: Option<&(dyn std::error::Error + '_)>,
    trace_id: Option<&str>,
) -> Result<()> {
    let state = state::current()?;

    let resolved_peer = state.registry.resolve(peer_service);
    let labels = operation_labels(
        &state.identity.service_name,
        &state.identity.service_version,
        &resolved_peer,
        level,
        log_type,
    );

    // Guard drop records the duration and balances the active count on
    // every exit path.
    let _operation = state.metrics.begin_operation(labels.clone());

    let sanitized = exception.map(|e| sanitize_error(e));
    if level.is_error_class() || sanitized.is_some() {
        let exception_type = sanitized
            .as_ref()
            .map(|e| e.exception_type.as_str())
            .unwrap_or("none");
        state.metrics.record_error(&labels, exception_type);
    }

    let call_span = state.tracer.as_ref().map(|tracer| {
        span::start_call_span(
            tracer,
            function_name,
            level,
            log_type,
            &resolved_peer,
            &state.identity.service_name,
        )
    });

    let record = LogRecord::build(
        &state.identity,
        CallData {
            level,
            function_name: function_name.to_string(),
            message,
            peer_service: resolved_peer,
            log_type,
            input,
            response,
            exception: sanitized.clone(),
            trace_id: trace_id.map(str::to_string),
        },
        call_span.as_ref().map(|s| &s.ids),
    );

    match record.to_json_line() {
        Ok(line) => {
            if state.config.console_enabled {
                console::write_line(&line);
            }
            if let Some(sink) = &state.file_sink {
                sink.write(&line, record.is_error_class());
            }
        }
        Err(e) => {
            eprintln!("Sovdev Logger failed to serialize log record: {e}");
        }
    }

    if let Some(logger) = &state.otlp_logger {
        otlp_log::emit_record(logger, &record);
    }

    if let Some(call_span) = call_span {
        call_span.finish(level, sanitized.as_ref());
    }

    Ok(())
}
