//! Internal logging system for the XGL ICD
//!
//! This module provides:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default, filtered by the `XGL_LOG` variable
//! - File and line information for ERROR logs

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Environment variable read by `DefaultLogger::from_env()`
pub const LOG_LEVEL_ENV: &str = "XGL_LOG";

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use xgl_icd::xgl::log::{Logger, LogEntry};
///
/// struct LayerLogger;
///
/// impl Logger for LayerLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Forward to the debug-report layer...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source component (e.g., "xgl::Icd", "xgl::Shader")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogSeverity {
    /// Fixed-width label used in console output
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }

    /// Parse a severity name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogSeverity::Trace),
            "debug" => Some(LogSeverity::Debug),
            "info" => Some(LogSeverity::Info),
            "warn" | "warning" => Some(LogSeverity::Warn),
            "error" => Some(LogSeverity::Error),
            _ => None,
        }
    }
}

/// Format an entry as `[timestamp] [SEVERITY] [source] message (file:line)`
///
/// The `(file:line)` suffix is only present when both are set.
pub fn format_entry(entry: &LogEntry) -> String {
    let datetime: DateTime<Local> = entry.timestamp.into();
    let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

    let mut line = format!(
        "[{}] [{}] [{}] {}",
        timestamp,
        entry.severity.label(),
        entry.source,
        entry.message
    );
    if let (Some(file), Some(l)) = (entry.file, entry.line) {
        line.push_str(&format!(" ({}:{})", file, l));
    }
    line
}

/// Default logger using colored console output
///
/// Entries below `min_severity` are dropped.
pub struct DefaultLogger {
    pub min_severity: LogSeverity,
}

impl DefaultLogger {
    pub fn new(min_severity: LogSeverity) -> Self {
        Self { min_severity }
    }

    /// Build a logger whose threshold comes from `XGL_LOG` (default: Info)
    pub fn from_env() -> Self {
        let min_severity = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|v| LogSeverity::parse(&v))
            .unwrap_or(LogSeverity::Info);
        Self::new(min_severity)
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new(LogSeverity::Info)
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.severity < self.min_severity {
            return;
        }

        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => entry.severity.label().bright_black(),
            LogSeverity::Debug => entry.severity.label().cyan(),
            LogSeverity::Info => entry.severity.label().green(),
            LogSeverity::Warn => entry.severity.label().yellow(),
            LogSeverity::Error => entry.severity.label().red().bold(),
        };
        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            eprintln!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            eprintln!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
#[macro_export]
macro_rules! icd_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::xgl::Icd::log(
            $crate::xgl::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! icd_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::xgl::Icd::log(
            $crate::xgl::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! icd_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::xgl::Icd::log(
            $crate::xgl::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! icd_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::xgl::Icd::log(
            $crate::xgl::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! icd_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::xgl::Icd::log_detailed(
            $crate::xgl::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
