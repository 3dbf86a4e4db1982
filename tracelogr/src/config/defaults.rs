//! Default values for sink and logging configuration.

/// Field key carrying the verbosity level on `info` records.
pub const DEFAULT_VERBOSITY_FIELD_NAME: &str = "v";

/// Field key carrying the error text on `error` records.
pub const DEFAULT_ERROR_FIELD_NAME: &str = "err";

/// Separator placed between logger name segments.
pub const DEFAULT_NAME_SEPARATOR: &str = "/";

/// Filter directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER_DIRECTIVE: &str = "info";

/// Directory for log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Log file name.
pub const DEFAULT_LOG_FILE: &str = "tracelogr.log";
