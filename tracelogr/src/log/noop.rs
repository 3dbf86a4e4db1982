//! Sink that discards everything.

use super::r#trait::LogSink;
use crate::backend::noop_helper;
use crate::field::Field;
use std::any::Any;
use std::error::Error;
use std::panic::Location;

/// A sink that discards all records.
///
/// Useful for:
/// - Unit tests where log output would be noise
/// - Components that require a logger but whose caller has none
///
/// # Example
///
/// ```
/// use tracelogr::Logger;
///
/// let logger = Logger::discard();
/// assert!(!logger.enabled());
/// logger.info("This message is discarded", &[]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl LogSink for DiscardSink {
    fn enabled(&self, _level: i32) -> bool {
        false
    }

    #[inline]
    fn info_at(
        &self,
        _level: i32,
        _msg: &str,
        _fields: &[Field],
        _caller: &'static Location<'static>,
    ) {
    }

    #[inline]
    fn error_at(
        &self,
        _err: Option<&dyn Error>,
        _msg: &str,
        _fields: &[Field],
        _caller: &'static Location<'static>,
    ) {
    }

    fn with_values(&self, _fields: &[Field]) -> Box<dyn LogSink> {
        Box::new(*self)
    }

    fn with_name(&self, _name: &str) -> Box<dyn LogSink> {
        Box::new(*self)
    }

    fn with_call_depth(&self, _depth: usize) -> Box<dyn LogSink> {
        Box::new(*self)
    }

    fn call_stack_helper(&self) -> fn() {
        noop_helper
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv;

    #[test]
    fn test_discard_sink_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiscardSink>();
    }

    #[test]
    fn test_discard_sink_as_trait_object() {
        let sink: Box<dyn LogSink> = Box::new(DiscardSink);
        assert!(!sink.enabled(0));
        sink.info(0, "info message", &kv!["k" => "v"]);
        sink.error(None, "error message", &[]);
    }

    #[test]
    fn test_derivations_stay_discarding() {
        let sink = DiscardSink
            .with_name("a")
            .with_values(&kv!["k" => 1])
            .with_call_depth(2);
        assert!(!sink.enabled(-1));
        assert!(sink.as_any().is::<DiscardSink>());
    }

    #[test]
    fn test_discard_sink_debug_impl() {
        let debug_str = format!("{:?}", DiscardSink);
        assert_eq!(debug_str, "DiscardSink");
    }
}
