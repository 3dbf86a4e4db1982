//! Caller-facing logger handle and constructors.

use super::adapter::BackendSink;
use super::noop::DiscardSink;
use super::r#trait::{LogSink, RuntimeInfo, Underlier};
use crate::backend::Backend;
use crate::config::SinkOption;
use crate::field::Field;
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Leveled logger over any [`LogSink`].
///
/// Cheap to clone; every `with_*` and [`Logger::v`] returns a new logger and
/// leaves the receiver untouched.
///
/// # Example
///
/// ```
/// use std::io;
/// use tracelogr::backend::MemoryBackend;
/// use tracelogr::{kv, new_logger, Severity};
///
/// let backend = MemoryBackend::new(Severity::Debug);
/// let logger = new_logger(backend.clone());
///
/// logger.info("info msg", &[]);
/// logger.with_name("loggerName").v(1).info("debug message", &[]);
/// let err = io::Error::new(io::ErrorKind::Other, "whoops");
/// logger.error(Some(&err), "additional msg", &kv!["key" => "value"]);
/// logger.error(None, "no error but err level", &[]);
///
/// assert_eq!(
///     backend.lines(),
///     vec![
///         "INFO info msg v=0",
///         "DEBUG loggerName: debug message v=1",
///         "ERROR additional msg err=whoops key=value",
///         "ERROR no error but err level",
///     ]
/// );
/// ```
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    level: i32,
}

impl Logger {
    /// Wrap a sink. The sink's `init` runs once, here.
    pub fn new(sink: impl LogSink) -> Self {
        Self::from_arc(Arc::new(sink))
    }

    /// Logger that drops everything.
    pub fn discard() -> Self {
        Self::new(DiscardSink)
    }

    fn from_arc(sink: Arc<dyn LogSink>) -> Self {
        sink.init(RuntimeInfo { call_depth: 1 });
        Self { sink, level: 0 }
    }

    fn derive(&self, sink: Box<dyn LogSink>) -> Self {
        Self {
            sink: Arc::from(sink),
            level: self.level,
        }
    }

    /// Current verbosity level.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Logger that is `level` steps more verbose. Negative values count as 0.
    pub fn v(&self, level: i32) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            level: self.level.saturating_add(level.max(0)),
        }
    }

    /// Whether `info` at the current verbosity would be emitted.
    pub fn enabled(&self) -> bool {
        self.sink.enabled(self.level)
    }

    /// Emit a non-error record if the current verbosity is enabled.
    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        if self.enabled() {
            self.sink.info_at(self.level, msg, fields, Location::caller());
        }
    }

    /// Emit an error record. Not subject to verbosity.
    #[track_caller]
    pub fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Field]) {
        self.sink.error_at(err, msg, fields, Location::caller());
    }

    pub fn with_values(&self, fields: &[Field]) -> Self {
        self.derive(self.sink.with_values(fields))
    }

    pub fn with_name(&self, name: &str) -> Self {
        self.derive(self.sink.with_name(name))
    }

    /// Logger that reports callers `depth` frames further up the stack.
    pub fn with_call_depth(&self, depth: usize) -> Self {
        self.derive(self.sink.with_call_depth(depth))
    }

    /// Marker function for helpers, see [`LogSink::call_stack_helper`].
    pub fn call_stack_helper(&self) -> fn() {
        self.sink.call_stack_helper()
    }

    pub fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }

    /// Backend handle of type `B`, if this logger wraps a [`BackendSink<B>`].
    ///
    /// Breaks the sink abstraction; see [`Underlier`].
    pub fn underlying<B: Backend>(&self) -> Option<&B> {
        self.sink
            .as_any()
            .downcast_ref::<BackendSink<B>>()
            .map(|sink| sink.underlying())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// Sink adapter over `backend` with default field names and separator.
pub fn new_log_sink<B: Backend>(backend: B) -> BackendSink<B> {
    BackendSink::new(backend)
}

/// Sink adapter over `backend`, applying `options` in order.
pub fn new_log_sink_with_options<B: Backend>(
    backend: B,
    options: impl IntoIterator<Item = SinkOption>,
) -> BackendSink<B> {
    BackendSink::with_options(backend, options)
}

/// Logger over `backend` with default field names and separator.
pub fn new_logger<B: Backend>(backend: B) -> Logger {
    Logger::new(new_log_sink(backend))
}

/// Logger over `backend`, applying `options` in order.
///
/// ```
/// use tracelogr::backend::MemoryBackend;
/// use tracelogr::config::{with_error_field_name, with_verbosity_field_name};
/// use tracelogr::new_logger_with_options;
///
/// let backend = MemoryBackend::default();
/// let logger = new_logger_with_options(
///     backend.clone(),
///     [
///         with_error_field_name("error"),
///         with_verbosity_field_name("verbosity"),
///     ],
/// );
/// logger.v(1).info("does not get logged", &[]);
/// logger.info("some message", &[]);
///
/// assert_eq!(backend.lines(), vec!["INFO some message verbosity=0"]);
/// ```
pub fn new_logger_with_options<B: Backend>(
    backend: B,
    options: impl IntoIterator<Item = SinkOption>,
) -> Logger {
    Logger::new(new_log_sink_with_options(backend, options))
}
