//! Tracing library backend implementation.

use super::caller::resolve_caller;
use super::r#trait::Backend;
use crate::field::{encode_fields, Field};
use crate::level::Severity;
use std::panic::Location;
use std::sync::Arc;

/// Target every event from [`TracingBackend`] is emitted under.
pub const LOG_TARGET: &str = "tracelogr";

/// Event field carrying the record's key/value pairs, encoded with
/// [`encode_fields`].
pub const FIELDS_KEY: &str = "kv";

/// Construction options for [`TracingBackend`].
///
/// # Example
///
/// ```
/// use tracelogr::backend::{Backend, TracingBackend, TracingOptions};
/// use tracelogr::{kv, Severity};
///
/// let backend = TracingBackend::with_options(
///     TracingOptions::new()
///         .with_level(Severity::Debug)
///         .with_prefix("test-prefix")
///         .with_fields(kv!["key-pair" => 1]),
/// );
/// assert_eq!(backend.level(), Severity::Debug);
/// assert_eq!(backend.prefix(), "test-prefix");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingOptions {
    level: Severity,
    prefix: String,
    report_caller: bool,
    caller_offset: usize,
    fields: Vec<Field>,
}

impl TracingOptions {
    /// Options with an info threshold and nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum severity emitted.
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Set the initial name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Attach a `caller=file:line:col` field to every event.
    pub fn with_report_caller(mut self, report_caller: bool) -> Self {
        self.report_caller = report_caller;
        self
    }

    /// Set the initial caller offset.
    pub fn with_caller_offset(mut self, offset: usize) -> Self {
        self.caller_offset = offset;
        self
    }

    /// Fields attached to every record.
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }
}

/// Backend that delegates to the `tracing` crate.
///
/// Each record becomes one event on the [`LOG_TARGET`] target at the
/// matching `tracing::Level`. The event carries:
///
/// - `prefix`: the accumulated name, when there is one
/// - `caller`: the reporting source location, when enabled
/// - `kv`: attached fields then call fields, as typed `[key, value]` pairs
///
/// Output format, timestamps and colors belong to the installed subscriber.
/// [`RecordFormat`](crate::format::RecordFormat) expands `kv` back into
/// top-level keys. The caller is the `#[track_caller]` call site, moved up
/// by the handle's caller offset.
#[derive(Debug, Clone)]
pub struct TracingBackend {
    level: Severity,
    prefix: Arc<str>,
    fields: Arc<[Field]>,
    report_caller: bool,
    caller_offset: usize,
}

macro_rules! emit {
    ($level:expr, $msg:expr, $prefix:expr, $caller:expr, $kv:expr) => {
        tracing::event!(
            target: LOG_TARGET,
            $level,
            prefix = $prefix,
            caller = $caller,
            kv = $kv,
            "{}",
            $msg
        )
    };
}

impl TracingBackend {
    /// Create a backend with default options.
    pub fn new() -> Self {
        Self::with_options(TracingOptions::default())
    }

    /// Create a backend from explicit options.
    pub fn with_options(options: TracingOptions) -> Self {
        Self {
            level: options.level,
            prefix: options.prefix.into(),
            fields: options.fields.into(),
            report_caller: options.report_caller,
            caller_offset: options.caller_offset,
        }
    }

    /// Fields attached to every record from this handle.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn reports_caller(&self) -> bool {
        self.report_caller
    }
}

impl Default for TracingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for TracingBackend {
    fn level(&self) -> Severity {
        self.level
    }

    fn log(
        &self,
        severity: Severity,
        msg: &str,
        fields: &[Field],
        caller: &'static Location<'static>,
    ) {
        if severity < self.level {
            return;
        }

        let kv = (!self.fields.is_empty() || !fields.is_empty())
            .then(|| encode_fields(&[&self.fields[..], fields]));
        let kv = kv.as_deref();
        let prefix = (!self.prefix.is_empty()).then_some(&*self.prefix);
        let caller = self
            .report_caller
            .then(|| tracing::field::display(resolve_caller(caller, self.caller_offset)));

        match severity {
            Severity::Debug => emit!(tracing::Level::DEBUG, msg, prefix, caller, kv),
            Severity::Info => emit!(tracing::Level::INFO, msg, prefix, caller, kv),
            Severity::Warn => emit!(tracing::Level::WARN, msg, prefix, caller, kv),
            Severity::Error => emit!(tracing::Level::ERROR, msg, prefix, caller, kv),
        }
    }

    fn with_fields(&self, fields: &[Field]) -> Self {
        let mut derived = self.clone();
        derived.fields = self.fields.iter().chain(fields).cloned().collect();
        derived
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn with_prefix(&self, prefix: &str) -> Self {
        let mut derived = self.clone();
        derived.prefix = prefix.into();
        derived
    }

    fn caller_offset(&self) -> usize {
        self.caller_offset
    }

    fn with_caller_offset(&self, offset: usize) -> Self {
        let mut derived = self.clone();
        derived.caller_offset = offset;
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv;
    use crate::test_support::capture;

    fn here() -> &'static Location<'static> {
        Location::caller()
    }

    #[inline(never)]
    fn log_from_helper(backend: &TracingBackend) {
        backend.log(Severity::Info, "from helper", &[], Location::caller());
    }

    #[test]
    fn test_tracing_backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TracingBackend>();
    }

    #[test]
    fn test_defaults() {
        let backend = TracingBackend::default();
        assert_eq!(backend.level(), Severity::Info);
        assert_eq!(backend.prefix(), "");
        assert_eq!(backend.caller_offset(), 0);
        assert!(backend.fields().is_empty());
        assert!(!backend.reports_caller());
    }

    #[test]
    fn test_emits_message_prefix_and_fields() {
        let backend = TracingBackend::with_options(TracingOptions::new().with_prefix("svc"));
        let output = capture(|| {
            backend.log(Severity::Info, "some message", &kv!["v" => 0], here());
        });

        assert_eq!(output, "INFO svc: some message v=0\n");
    }

    #[test]
    fn test_maps_each_severity() {
        let backend = TracingBackend::with_options(TracingOptions::new().with_level(Severity::Debug));
        let output = capture(|| {
            backend.log(Severity::Debug, "d", &[], here());
            backend.log(Severity::Warn, "w", &[], here());
            backend.log(Severity::Error, "e", &[], here());
        });

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["DEBUG d", "WARN w", "ERROR e"]);
    }

    #[test]
    fn test_drops_records_below_level() {
        let backend = TracingBackend::new();
        let output = capture(|| {
            backend.log(Severity::Debug, "hidden", &[], here());
        });
        assert!(output.is_empty(), "{output}");
    }

    #[test]
    fn test_no_fields_or_prefix_when_absent() {
        let backend = TracingBackend::new();
        let output = capture(|| {
            backend.log(Severity::Error, "bare", &[], here());
        });
        assert_eq!(output, "ERROR bare\n");
    }

    #[test]
    fn test_attached_fields_precede_call_fields() {
        let backend = TracingBackend::with_options(
            TracingOptions::new().with_fields(kv!["key-pair" => 1, "another-key" => "value-for-that"]),
        );
        let output = capture(|| {
            backend.log(Severity::Info, "msg", &kv!["v" => 0], here());
        });
        assert!(
            output.ends_with("msg key-pair=1 another-key=value-for-that v=0\n"),
            "{output}"
        );
    }

    #[test]
    fn test_report_caller() {
        let backend = TracingBackend::with_options(TracingOptions::new().with_report_caller(true));
        let location = here();
        let output = capture(|| {
            backend.log(Severity::Info, "msg", &[], location);
        });
        assert!(output.contains(&format!("<{}>", location)), "{output}");
    }

    #[test]
    fn test_caller_offset_moves_reported_caller() {
        let backend = TracingBackend::with_options(TracingOptions::new().with_report_caller(true));

        let line = line!() + 1;
        let output = capture(|| log_from_helper(&backend.with_caller_offset(1)));

        assert!(output.contains(&format!("tracing_adapter.rs:{}", line)), "{output}");
    }

    #[test]
    fn test_derivations_leave_original_untouched() {
        let original = TracingBackend::new();
        let named = original.with_prefix("a");
        let with_fields = original.with_fields(&kv!["k" => "v"]);
        let offset = original.with_caller_offset(2);

        assert_eq!(original.prefix(), "");
        assert!(original.fields().is_empty());
        assert_eq!(original.caller_offset(), 0);

        assert_eq!(named.prefix(), "a");
        assert_eq!(with_fields.fields(), kv!["k" => "v"].as_slice());
        assert_eq!(offset.caller_offset(), 2);
    }

    #[test]
    fn test_with_fields_accumulates() {
        let backend = TracingBackend::new()
            .with_fields(&kv!["a" => 1])
            .with_fields(&kv!["b" => 2]);
        assert_eq!(backend.fields(), kv!["a" => 1, "b" => 2].as_slice());
    }

    #[test]
    fn test_helper_is_callable() {
        let helper = TracingBackend::new().helper();
        helper();
    }
}
