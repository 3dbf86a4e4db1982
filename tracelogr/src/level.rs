//! Backend severities and the verbosity-to-severity mapping.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Discrete severity understood by a backend.
///
/// Ordered from most to least verbose, so `Severity::Debug < Severity::Error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Debugging information, produced by positive verbosity levels
    Debug,
    /// General information, produced by verbosity 0
    #[default]
    Info,
    /// Warning messages
    Warn,
    /// Error messages
    Error,
}

impl Severity {
    /// Map a sink verbosity level onto a backend severity.
    ///
    /// This is a fixed two-bucket mapping: `level <= 0` is `Info`, anything
    /// more verbose is `Debug`.
    ///
    /// ```
    /// use tracelogr::Severity;
    ///
    /// assert_eq!(Severity::from_verbosity(-3), Severity::Info);
    /// assert_eq!(Severity::from_verbosity(0), Severity::Info);
    /// assert_eq!(Severity::from_verbosity(7), Severity::Debug);
    /// ```
    pub fn from_verbosity(level: i32) -> Self {
        if level <= 0 {
            Severity::Info
        } else {
            Severity::Debug
        }
    }

    /// Lowercase name, as rendered in records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// Severity matching the most verbose level a `tracing` filter lets through.
    ///
    /// `TRACE` has no counterpart and collapses onto `Debug`. `OFF` maps to
    /// `Error`, the least verbose severity available.
    pub fn from_level_filter(filter: LevelFilter) -> Self {
        match filter.into_level() {
            Some(tracing::Level::TRACE) | Some(tracing::Level::DEBUG) => Severity::Debug,
            Some(tracing::Level::INFO) => Severity::Info,
            Some(tracing::Level::WARN) => Severity::Warn,
            Some(tracing::Level::ERROR) | None => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for tracing::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Debug => tracing::Level::DEBUG,
            Severity::Info => tracing::Level::INFO,
            Severity::Warn => tracing::Level::WARN,
            Severity::Error => tracing::Level::ERROR,
        }
    }
}

impl From<Severity> for LevelFilter {
    fn from(severity: Severity) -> Self {
        LevelFilter::from_level(severity.into())
    }
}

/// Error parsing a severity name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid severity '{input}' - expected one of debug, info, warn, error")]
pub struct ParseSeverityError {
    input: String,
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            _ => Err(ParseSeverityError {
                input: s.to_string(),
            }),
        }
    }
}
