//! Sink trait definition.

use crate::field::Field;
use std::any::Any;
use std::error::Error;
use std::panic::Location;

/// Information the front-end logger hands a sink once, at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuntimeInfo {
    /// Frames between the caller and the sink methods
    pub call_depth: usize,
}

/// Generic leveled logging contract.
///
/// A sink receives already-gated calls from a [`Logger`](crate::Logger):
/// `info` only runs when `enabled` said yes, `error` always runs. Every
/// `with_*` method returns a new, independent sink and never changes `self`.
///
/// The source location of the logging call travels explicitly as `caller`.
/// The [`Logger`](crate::Logger) captures it with `#[track_caller]` before
/// the dynamic dispatch, which would otherwise hide it. Direct callers can
/// use the tracked `info` and `error` conveniences.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across threads.
pub trait LogSink: Send + Sync + 'static {
    /// Receive runtime information. Called once by the logger.
    fn init(&self, _info: RuntimeInfo) {}

    /// Whether an `info` call at `level` would be emitted.
    fn enabled(&self, level: i32) -> bool;

    /// Emit a non-error record at verbosity `level`, attributed to `caller`.
    fn info_at(
        &self,
        level: i32,
        msg: &str,
        fields: &[Field],
        caller: &'static Location<'static>,
    );

    /// Emit an error record, with or without an error value, attributed to
    /// `caller`.
    fn error_at(
        &self,
        err: Option<&dyn Error>,
        msg: &str,
        fields: &[Field],
        caller: &'static Location<'static>,
    );

    /// Emit a non-error record at verbosity `level`.
    #[track_caller]
    fn info(&self, level: i32, msg: &str, fields: &[Field]) {
        self.info_at(level, msg, fields, Location::caller());
    }

    /// Emit an error record, with or without an error value.
    #[track_caller]
    fn error(&self, err: Option<&dyn Error>, msg: &str, fields: &[Field]) {
        self.error_at(err, msg, fields, Location::caller());
    }

    /// New sink that attaches `fields` to every later record.
    fn with_values(&self, fields: &[Field]) -> Box<dyn LogSink>;

    /// New sink with `name` appended to the hierarchical name.
    fn with_name(&self, name: &str) -> Box<dyn LogSink>;

    /// New sink that skips `depth` additional frames when reporting callers.
    fn with_call_depth(&self, depth: usize) -> Box<dyn LogSink>;

    /// Marker a helper function calls to exclude its frame from caller
    /// reporting.
    fn call_stack_helper(&self) -> fn();

    /// Type-erased view of the concrete sink, for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Access to the concrete backend behind a sink.
///
/// Callers only hold a [`Logger`](crate::Logger), so reaching the backend
/// means knowing which implementation is in use. This is an escape hatch for
/// backend-specific features, not part of the sink abstraction.
pub trait Underlier {
    type Backend;

    /// The raw backend handle.
    fn underlying(&self) -> &Self::Backend;
}
