//! Common test utilities for sovdev-logger-client integration tests
//!
//! Initialization reads the process environment, and environment mutation
//! is process-global, so every test that touches it serializes on
//! [`env_lock`] and configures the file sink into its own temp directory.

// Not every test binary uses every helper.
#![allow(dead_code)]

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Serializes tests that mutate the process environment
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Variables the library reads; cleared between tests
pub const LOGGER_VARS: [&str; 12] = [
    "LOG_TO_CONSOLE",
    "LOG_TO_FILE",
    "LOG_FILE_PATH",
    "LOG_FILE_MAX_BYTES",
    "LOG_FILE_BACKUP_COUNT",
    "OTEL_EXPORTER_OTLP_ENDPOINT",
    "OTEL_EXPORTER_OTLP_LOGS_ENDPOINT",
    "OTEL_EXPORTER_OTLP_METRICS_ENDPOINT",
    "OTEL_EXPORTER_OTLP_TRACES_ENDPOINT",
    "OTEL_EXPORTER_OTLP_HEADERS",
    "DEPLOYMENT_ENVIRONMENT",
    "SERVICE_VERSION",
];

/// Take the environment lock and start from a clean slate
pub fn env_lock() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    sovdev_logger_client::reset();
    for var in LOGGER_VARS {
        std::env::remove_var(var);
    }
    guard
}

/// Point the file sink at `dir` and disable console output
///
/// Console stays off so test output is not flooded with record lines.
pub fn configure_file_sink(dir: &Path) {
    std::env::set_var("LOG_TO_CONSOLE", "false");
    std::env::set_var("LOG_TO_FILE", "true");
    std::env::set_var("LOG_FILE_PATH", dir.to_str().unwrap());
}

/// Read an NDJSON log file into parsed records
pub fn read_records(path: &Path) -> Vec<Value> {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("log line is valid JSON"))
        .collect()
}

/// Peer mapping used across scenario tests
pub fn sample_peers() -> HashMap<String, String> {
    HashMap::from([("BRREG".to_string(), "SYS1234567".to_string())])
}
