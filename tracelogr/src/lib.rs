//! tracelogr - a generic leveled log sink backed by `tracing`
//!
//! Application code logs through a [`Logger`], which talks to a [`LogSink`].
//! The [`BackendSink`] adapter implements that sink contract on top of a
//! concrete structured [`Backend`](backend::Backend). It translates verbosity
//! into severities, injects the verbosity and error fields, and joins
//! hierarchical names.
//!
//! # Quick Start
//!
//! ```ignore
//! use tracelogr::backend::{TracingBackend, TracingOptions};
//! use tracelogr::logging::{init_logging, LoggingConfig};
//! use tracelogr::{kv, new_logger, Severity};
//!
//! let _guard = init_logging(&LoggingConfig::default())?;
//! let logger = new_logger(TracingBackend::with_options(
//!     TracingOptions::new().with_level(Severity::Debug),
//! ));
//!
//! logger.info("info msg", &[]);
//! logger.with_name("loggerName").v(1).info("debug message", &[]);
//! logger.error(Some(&err), "additional msg", &kv!["key" => "value"]);
//! ```

pub mod backend;
pub mod config;
pub mod field;
pub mod format;
pub mod level;
pub mod log;
pub mod logging;

#[cfg(test)]
pub(crate) mod test_support;

pub use field::{Field, Value};
pub use level::Severity;
pub use log::{
    new_log_sink, new_log_sink_with_options, new_logger, new_logger_with_options, BackendSink,
    DiscardSink, LogSink, Logger, RuntimeInfo, Underlier,
};

/// Version of the tracelogr library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
