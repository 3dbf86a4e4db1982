//! Backend trait definition.

use crate::field::Field;
use crate::level::Severity;
use std::panic::Location;

/// Helper marker that does nothing.
///
/// Caller attribution in this crate comes from `#[track_caller]`, so a
/// backend has nothing to record when a frame declares itself a helper.
pub fn noop_helper() {}

/// Interface a concrete structured logger offers to the sink adapter.
///
/// Handles are values: every `with_*` method returns a new handle and leaves
/// `self` untouched. Cloning must be cheap enough to do on every derivation.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The adapter adds no locking of
/// its own, so a backend that is safe to share makes the adapter safe too.
pub trait Backend: Clone + Send + Sync + 'static {
    /// Minimum severity this handle emits.
    fn level(&self) -> Severity;

    /// Emit one record.
    ///
    /// `fields` are the per-call fields; the handle appends them after its
    /// own attached fields. Records below [`Backend::level`] are dropped.
    fn log(
        &self,
        severity: Severity,
        msg: &str,
        fields: &[Field],
        caller: &'static Location<'static>,
    );

    /// New handle with `fields` attached to every later record.
    fn with_fields(&self, fields: &[Field]) -> Self;

    /// Current name prefix, empty when unnamed.
    fn prefix(&self) -> &str;

    /// New handle whose prefix is replaced by `prefix`.
    fn with_prefix(&self, prefix: &str) -> Self;

    /// Extra stack frames skipped when attributing a caller.
    fn caller_offset(&self) -> usize;

    /// New handle with the caller offset replaced by `offset`.
    fn with_caller_offset(&self, offset: usize) -> Self;

    /// Marker a helper function calls to exclude its frame from caller
    /// attribution.
    fn helper(&self) -> fn() {
        noop_helper
    }
}
