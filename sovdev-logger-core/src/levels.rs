//! Log levels
//!
//! The six levels of the governance standard, in ascending severity.
//! ERROR and FATAL are the incident-triggering levels: they route records to
//! the error file sink and increment the error counter.
//!
//! Levels serialize as uppercase strings on every sink (`"INFO"`, `"FATAL"`).
//! The numeric severities follow the OpenTelemetry log data model
//! (TRACE=1, DEBUG=5, INFO=9, WARN=13, ERROR=17, FATAL=21).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Log level for a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Detailed trace information (very verbose)
    Trace,
    /// Debug information for development
    Debug,
    /// Informational messages
    Info,
    /// Warning messages (potential issues)
    Warn,
    /// Error messages (triggers an incident)
    Error,
    /// Fatal errors (triggers an incident)
    Fatal,
}

impl LogLevel {
    /// All levels in ascending severity order
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Uppercase wire form, as emitted on every sink
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// OpenTelemetry severity number for this level
    pub fn severity(&self) -> u8 {
        match self {
            LogLevel::Trace => 1,
            LogLevel::Debug => 5,
            LogLevel::Info => 9,
            LogLevel::Warn => 13,
            LogLevel::Error => 17,
            LogLevel::Fatal => 21,
        }
    }

    /// Whether records at this level belong to the error class
    ///
    /// Error-class records go to `error.log` in addition to `dev.log` and
    /// increment `sovdev_errors_total`.
    pub fn is_error_class(&self) -> bool {
        matches!(self, LogLevel::Error | LogLevel::Fatal)
    }

    /// Parse a level name, accepting any case
    pub fn parse(name: &str) -> Option<LogLevel> {
        match name.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            "FATAL" => Some(LogLevel::Fatal),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
