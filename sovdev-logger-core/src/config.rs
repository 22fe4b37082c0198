//! Run configuration
//!
//! Reads the fixed set of environment variables once at initialization and
//! produces an immutable [`RunConfig`] that the fan-out consults on every
//! call. The resolver never aborts: malformed values produce a stderr
//! warning and fall back to the documented default.
//!
//! # Smart defaults
//!
//! Console output is enabled exactly when no OTLP endpoint is configured,
//! so a bare local run prints records while a collector-connected
//! deployment stays quiet unless console is explicitly requested. When
//! console, file and OTLP are all disabled, a single startup warning says
//! so.
//!
//! # Environment variables
//!
//! - `LOG_TO_CONSOLE`: true/false/auto (default auto)
//! - `LOG_TO_FILE`: true/false (default false)
//! - `LOG_FILE_PATH`: log directory (default `./logs/`)
//! - `LOG_FILE_MAX_BYTES`: rotation threshold (default 52428800 = 50 MiB)
//! - `LOG_FILE_BACKUP_COUNT`: rotated files kept (default 5)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` and the per-signal
//!   `…_LOGS_ENDPOINT` / `…_METRICS_ENDPOINT` / `…_TRACES_ENDPOINT`
//! - `OTEL_EXPORTER_OTLP_HEADERS`: JSON object of header name/value pairs
//! - `DEPLOYMENT_ENVIRONMENT`: resource attribute (default `development`)
//! - `SERVICE_VERSION`: version fallback when not passed to `initialize`

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Default log directory
pub const DEFAULT_LOG_DIR: &str = "./logs/";
/// Default rotation threshold, 50 MiB
pub const DEFAULT_MAX_BYTES: i64 = 52_428_800;
/// Default number of rotated backups
pub const DEFAULT_BACKUP_COUNT: i64 = 5;
/// Default deployment environment resource attribute
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// OTLP endpoint and header configuration
///
/// Raw per-signal values; the resolved accessors apply the standard
/// base-endpoint path suffixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtlpSettings {
    pub base_endpoint: Option<String>,
    pub logs_endpoint: Option<String>,
    pub metrics_endpoint: Option<String>,
    pub traces_endpoint: Option<String>,
    pub headers: HashMap<String, String>,
}

impl OtlpSettings {
    /// Whether any OTLP endpoint is configured
    pub fn any_configured(&self) -> bool {
        self.base_endpoint.is_some()
            || self.logs_endpoint.is_some()
            || self.metrics_endpoint.is_some()
            || self.traces_endpoint.is_some()
    }

    /// Resolved logs endpoint: signal override, else base + `/v1/logs`
    pub fn resolved_logs_endpoint(&self) -> Option<String> {
        self.resolved(&self.logs_endpoint, "/v1/logs")
    }

    /// Resolved metrics endpoint: signal override, else base + `/v1/metrics`
    pub fn resolved_metrics_endpoint(&self) -> Option<String> {
        self.resolved(&self.metrics_endpoint, "/v1/metrics")
    }

    /// Resolved traces endpoint: signal override, else base + `/v1/traces`
    pub fn resolved_traces_endpoint(&self) -> Option<String> {
        self.resolved(&self.traces_endpoint, "/v1/traces")
    }

    fn resolved(&self, signal: &Option<String>, suffix: &str) -> Option<String> {
        signal.clone().or_else(|| {
            self.base_endpoint
                .as_ref()
                .map(|base| format!("{}{}", base.trim_end_matches('/'), suffix))
        })
    }
}

/// Immutable run configuration produced once per initialization
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub console_enabled: bool,
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_max_bytes: i64,
    pub file_backups: i64,
    pub otlp: OtlpSettings,
    pub environment: String,
}

impl RunConfig {
    /// Resolve the configuration from the process environment
    ///
    /// Emits at most one warning per malformed variable, plus the single
    /// all-transports-disabled warning when nothing is enabled.
    pub fn from_env() -> RunConfig {
        let otlp = otlp_from_env();
        let has_otlp = otlp.any_configured();

        let console_enabled = parse_console_env(has_otlp);
        let file_enabled = parse_bool_env("LOG_TO_FILE", false);

        let file_dir = env_trimmed("LOG_FILE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        let file_max_bytes = parse_int_env("LOG_FILE_MAX_BYTES", DEFAULT_MAX_BYTES);
        let file_backups = parse_int_env("LOG_FILE_BACKUP_COUNT", DEFAULT_BACKUP_COUNT);

        let environment =
            env_trimmed("DEPLOYMENT_ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        if !console_enabled && !file_enabled && !has_otlp {
            eprintln!("Warning: All log transports disabled (console, file, and OTLP)");
        }

        RunConfig {
            console_enabled,
            file_enabled,
            file_dir,
            file_max_bytes,
            file_backups,
            otlp,
            environment,
        }
    }

    /// Whether any OTLP pipeline is configured
    pub fn has_otlp(&self) -> bool {
        self.otlp.any_configured()
    }
}

/// `SERVICE_VERSION` fallback used when no version is passed to `initialize`
pub fn service_version_from_env() -> Option<String> {
    env_trimmed("SERVICE_VERSION")
}

/// Read a variable, returning it trimmed and only if non-empty
fn env_trimmed(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn otlp_from_env() -> OtlpSettings {
    OtlpSettings {
        base_endpoint: env_trimmed("OTEL_EXPORTER_OTLP_ENDPOINT"),
        logs_endpoint: env_trimmed("OTEL_EXPORTER_OTLP_LOGS_ENDPOINT"),
        metrics_endpoint: env_trimmed("OTEL_EXPORTER_OTLP_METRICS_ENDPOINT"),
        traces_endpoint: env_trimmed("OTEL_EXPORTER_OTLP_TRACES_ENDPOINT"),
        headers: parse_headers_env(),
    }
}

/// Parse `LOG_TO_CONSOLE` with the auto default
fn parse_console_env(has_otlp: bool) -> bool {
    let value = match env_trimmed("LOG_TO_CONSOLE") {
        Some(v) => v.to_lowercase(),
        None => return !has_otlp,
    };

    match value.as_str() {
        "auto" => !has_otlp,
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        other => {
            eprintln!("Warning: Invalid LOG_TO_CONSOLE value '{other}', using auto");
            !has_otlp
        }
    }
}

/// Parse a boolean variable, warning and defaulting on unrecognized values
fn parse_bool_env(name: &str, default: bool) -> bool {
    let value = match env_trimmed(name) {
        Some(v) => v.to_lowercase(),
        None => return default,
    };

    match value.as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        other => {
            eprintln!("Warning: Invalid value '{other}' for {name}, using default: {default}");
            default
        }
    }
}

/// Parse an integer variable; negative values are accepted literally
fn parse_int_env(name: &str, default: i64) -> i64 {
    let value = match env_trimmed(name) {
        Some(v) => v,
        None => return default,
    };

    match value.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Warning: Invalid value '{value}' for {name}, using default: {default}");
            default
        }
    }
}

/// Parse `OTEL_EXPORTER_OTLP_HEADERS` as a JSON object of string pairs
fn parse_headers_env() -> HashMap<String, String> {
    let raw = match env_trimmed("OTEL_EXPORTER_OTLP_HEADERS") {
        Some(v) => v,
        None => return HashMap::new(),
    };

    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&raw) {
        Ok(map) => map
            .into_iter()
            .map(|(k, v)| {
                let value = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, value)
            })
            .collect(),
        Err(_) => {
            eprintln!(
                "Warning: Invalid OTEL_EXPORTER_OTLP_HEADERS value, expected a JSON object; \
                 proceeding without headers"
            );
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // Environment mutation is process-global; serialize the tests touching it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 10] = [
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
    ];

    fn clean_env() -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for var in ALL_VARS {
            env::remove_var(var);
        }
        env::remove_var("DEPLOYMENT_ENVIRONMENT");
        env::remove_var("SERVICE_VERSION");
        guard
    }

    #[test]
    fn test_defaults_without_any_env() {
        let _guard = clean_env();
        let config = RunConfig::from_env();

        // Smart default: console on because no OTLP endpoint exists
        assert!(config.console_enabled);
        assert!(!config.file_enabled);
        assert_eq!(config.file_dir, PathBuf::from("./logs/"));
        assert_eq!(config.file_max_bytes, 52_428_800);
        assert_eq!(config.file_backups, 5);
        assert!(!config.has_otlp());
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_console_disabled_when_otlp_configured() {
        let _guard = clean_env();
        env::set_var("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4318");
        let config = RunConfig::from_env();

        assert!(!config.console_enabled);
        assert!(config.has_otlp());
    }

    #[test]
    fn test_console_explicit_true_overrides_otlp() {
        let _guard = clean_env();
        env::set_var("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4318");
        env::set_var("LOG_TO_CONSOLE", "true");
        let config = RunConfig::from_env();

        assert!(config.console_enabled);
    }

    #[test]
    fn test_console_accepts_bool_spellings() {
        let _guard = clean_env();
        for truthy in ["true", "1", "yes", " TRUE ", "Yes"] {
            env::set_var("LOG_TO_CONSOLE", truthy);
            assert!(RunConfig::from_env().console_enabled, "{truthy}");
        }
        for falsy in ["false", "0", "no", " FALSE "] {
            env::set_var("LOG_TO_CONSOLE", falsy);
            assert!(!RunConfig::from_env().console_enabled, "{falsy}");
        }
    }

    #[test]
    fn test_console_invalid_falls_back_to_auto() {
        let _guard = clean_env();
        env::set_var("LOG_TO_CONSOLE", "maybe");
        assert!(RunConfig::from_env().console_enabled);

        env::set_var("OTEL_EXPORTER_OTLP_LOGS_ENDPOINT", "http://c:4318/v1/logs");
        assert!(!RunConfig::from_env().console_enabled);
    }

    #[test]
    fn test_file_toggle_and_invalid_value() {
        let _guard = clean_env();
        env::set_var("LOG_TO_FILE", "true");
        assert!(RunConfig::from_env().file_enabled);

        env::set_var("LOG_TO_FILE", "not-a-bool");
        assert!(!RunConfig::from_env().file_enabled);
    }

    #[test]
    fn test_file_path_is_trimmed() {
        let _guard = clean_env();
        env::set_var("LOG_FILE_PATH", "  /var/log/app/  ");
        let config = RunConfig::from_env();

        assert_eq!(config.file_dir, PathBuf::from("/var/log/app/"));
    }

    #[test]
    fn test_int_parsing_and_fallbacks() {
        let _guard = clean_env();
        env::set_var("LOG_FILE_MAX_BYTES", "1024");
        env::set_var("LOG_FILE_BACKUP_COUNT", "2");
        let config = RunConfig::from_env();
        assert_eq!(config.file_max_bytes, 1024);
        assert_eq!(config.file_backups, 2);

        env::set_var("LOG_FILE_MAX_BYTES", "fifty megabytes");
        env::set_var("LOG_FILE_BACKUP_COUNT", "many");
        let config = RunConfig::from_env();
        assert_eq!(config.file_max_bytes, DEFAULT_MAX_BYTES);
        assert_eq!(config.file_backups, DEFAULT_BACKUP_COUNT);
    }

    #[test]
    fn test_negative_ints_accepted_literally() {
        let _guard = clean_env();
        env::set_var("LOG_FILE_MAX_BYTES", "-1");
        env::set_var("LOG_FILE_BACKUP_COUNT", "-3");
        let config = RunConfig::from_env();

        assert_eq!(config.file_max_bytes, -1);
        assert_eq!(config.file_backups, -3);
    }

    #[test]
    fn test_per_signal_endpoint_enables_otlp() {
        let _guard = clean_env();
        env::set_var(
            "OTEL_EXPORTER_OTLP_METRICS_ENDPOINT",
            "http://collector:4318/v1/metrics",
        );
        let config = RunConfig::from_env();

        assert!(config.has_otlp());
        assert_eq!(
            config.otlp.resolved_metrics_endpoint().as_deref(),
            Some("http://collector:4318/v1/metrics")
        );
        // Other signals stay unconfigured
        assert!(config.otlp.resolved_logs_endpoint().is_none());
        assert!(config.otlp.resolved_traces_endpoint().is_none());
    }

    #[test]
    fn test_base_endpoint_resolves_all_signals() {
        let _guard = clean_env();
        env::set_var("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4318/");
        let config = RunConfig::from_env();

        assert_eq!(
            config.otlp.resolved_logs_endpoint().as_deref(),
            Some("http://collector:4318/v1/logs")
        );
        assert_eq!(
            config.otlp.resolved_metrics_endpoint().as_deref(),
            Some("http://collector:4318/v1/metrics")
        );
        assert_eq!(
            config.otlp.resolved_traces_endpoint().as_deref(),
            Some("http://collector:4318/v1/traces")
        );
    }

    #[test]
    fn test_signal_endpoint_overrides_base() {
        let _guard = clean_env();
        env::set_var("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4318");
        env::set_var(
            "OTEL_EXPORTER_OTLP_TRACES_ENDPOINT",
            "http://traces-only:4318/v1/traces",
        );
        let config = RunConfig::from_env();

        assert_eq!(
            config.otlp.resolved_traces_endpoint().as_deref(),
            Some("http://traces-only:4318/v1/traces")
        );
        assert_eq!(
            config.otlp.resolved_logs_endpoint().as_deref(),
            Some("http://collector:4318/v1/logs")
        );
    }

    #[test]
    fn test_empty_endpoint_does_not_enable_otlp() {
        let _guard = clean_env();
        env::set_var("OTEL_EXPORTER_OTLP_ENDPOINT", "   ");
        let config = RunConfig::from_env();

        assert!(!config.has_otlp());
        assert!(config.console_enabled);
    }

    #[test]
    fn test_headers_json_object() {
        let _guard = clean_env();
        env::set_var(
            "OTEL_EXPORTER_OTLP_HEADERS",
            r#"{"Authorization": "Basic abc", "X-Scope-OrgID": "sovdev"}"#,
        );
        let config = RunConfig::from_env();

        assert_eq!(
            config.otlp.headers.get("Authorization").map(String::as_str),
            Some("Basic abc")
        );
        assert_eq!(
            config.otlp.headers.get("X-Scope-OrgID").map(String::as_str),
            Some("sovdev")
        );
    }

    #[test]
    fn test_headers_invalid_json_ignored() {
        let _guard = clean_env();
        env::set_var("OTEL_EXPORTER_OTLP_HEADERS", "Authorization=Basic abc");
        let config = RunConfig::from_env();

        assert!(config.otlp.headers.is_empty());
    }

    #[test]
    fn test_environment_and_version_env() {
        let _guard = clean_env();
        env::set_var("DEPLOYMENT_ENVIRONMENT", "staging");
        env::set_var("SERVICE_VERSION", "2.4.1");

        assert_eq!(RunConfig::from_env().environment, "staging");
        assert_eq!(service_version_from_env().as_deref(), Some("2.4.1"));
    }

    #[test]
    fn test_all_transports_disabled_still_resolves() {
        let _guard = clean_env();
        env::set_var("LOG_TO_CONSOLE", "false");
        env::set_var("LOG_TO_FILE", "false");
        let config = RunConfig::from_env();

        // Warning goes to stderr; the resolver itself never fails
        assert!(!config.console_enabled);
        assert!(!config.file_enabled);
        assert!(!config.has_otlp());
    }
}
