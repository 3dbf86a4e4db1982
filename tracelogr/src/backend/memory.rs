//! In-memory backend that keeps every record it is asked to emit.

use super::caller::{resolve_caller, Caller};
use super::r#trait::Backend;
use crate::field::{Field, FieldsDisplay};
use crate::level::Severity;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard};

/// One record captured by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub severity: Severity,
    pub message: String,
    pub prefix: String,
    /// Attached fields followed by per-call fields
    pub fields: Vec<Field>,
    /// Call site, after applying the handle's caller offset
    pub caller: Caller,
}

impl Record {
    /// Value of the first field named `key`, rendered as text.
    pub fn field(&self, key: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|field| field.key() == key)
            .map(|field| field.value().to_string())
    }
}

/// Renders like a plain text line: `severity prefix: message k=v ...`.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity.as_str().to_ascii_uppercase())?;
        if !self.prefix.is_empty() {
            write!(f, " {}:", self.prefix)?;
        }
        write!(f, " {}", self.message)?;
        let groups: [&[Field]; 1] = [&self.fields];
        let fields = FieldsDisplay::new(&groups);
        if !fields.is_empty() {
            write!(f, " {}", fields)?;
        }
        Ok(())
    }
}

/// Backend that appends each emitted record to a shared buffer.
///
/// Derived handles write into the same buffer as the handle they came from,
/// the way derived handles of a real logger share its output stream.
///
/// # Example
///
/// ```
/// use tracelogr::backend::{Backend, MemoryBackend};
/// use tracelogr::{new_logger, Severity};
///
/// let backend = MemoryBackend::new(Severity::Info);
/// let logger = new_logger(backend.clone());
/// logger.info("hello", &[]);
///
/// let records = backend.records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].to_string(), "INFO hello v=0");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    level: Severity,
    prefix: String,
    fields: Vec<Field>,
    caller_offset: usize,
    records: Arc<Mutex<Vec<Record>>>,
}

impl MemoryBackend {
    /// Create an empty backend with the given threshold.
    pub fn new(level: Severity) -> Self {
        Self {
            level,
            prefix: String::new(),
            fields: Vec::new(),
            caller_offset: 0,
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of everything emitted so far, oldest first.
    pub fn records(&self) -> Vec<Record> {
        self.lock().clone()
    }

    /// Remove and return everything emitted so far.
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.lock())
    }

    /// Records rendered as text lines.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    /// Fields attached to this handle.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
        // A panic while holding the lock leaves the Vec intact.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

impl Backend for MemoryBackend {
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
        let record = Record {
            severity,
            message: msg.to_string(),
            prefix: self.prefix.clone(),
            fields: self.fields.iter().chain(fields).cloned().collect(),
            caller: resolve_caller(caller, self.caller_offset),
        };
        self.lock().push(record);
    }

    fn with_fields(&self, fields: &[Field]) -> Self {
        let mut derived = self.clone();
        derived.fields.extend_from_slice(fields);
        derived
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn with_prefix(&self, prefix: &str) -> Self {
        let mut derived = self.clone();
        derived.prefix = prefix.to_string();
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

    #[test]
    fn test_records_and_takes() {
        let backend = MemoryBackend::default();
        backend.log(Severity::Info, "one", &[], Location::caller());
        backend.log(Severity::Error, "two", &kv!["k" => "v"], Location::caller());

        assert_eq!(backend.records().len(), 2);
        let taken = backend.take();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[1].field("k").as_deref(), Some("v"));
        assert!(backend.records().is_empty());
    }

    #[test]
    fn test_drops_below_level() {
        let backend = MemoryBackend::new(Severity::Warn);
        backend.log(Severity::Info, "quiet", &[], Location::caller());
        backend.log(Severity::Warn, "loud", &[], Location::caller());

        let records = backend.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "loud");
    }

    #[test]
    fn test_derived_handles_share_buffer() {
        let backend = MemoryBackend::default();
        let derived = backend.with_prefix("child").with_fields(&kv!["a" => 1]);
        derived.log(Severity::Info, "from child", &[], Location::caller());

        let records = backend.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prefix, "child");
        assert_eq!(records[0].fields, kv!["a" => 1]);
        assert_eq!(backend.prefix(), "");
        assert!(backend.fields().is_empty());
    }

    #[test]
    fn test_record_display() {
        let backend = MemoryBackend::new(Severity::Debug).with_prefix("loggerName");
        backend.log(Severity::Debug, "debug message", &kv!["v" => 1], Location::caller());
        assert_eq!(backend.lines(), vec!["DEBUG loggerName: debug message v=1"]);
    }

    #[test]
    fn test_caller_offset_roundtrip() {
        let backend = MemoryBackend::default();
        let offset = backend.with_caller_offset(3);
        assert_eq!(backend.caller_offset(), 0);
        assert_eq!(offset.caller_offset(), 3);
    }

    #[inline(never)]
    fn log_from_helper(backend: &MemoryBackend) {
        backend.log(Severity::Info, "from helper", &[], Location::caller());
    }

    #[test]
    fn test_caller_offset_skips_helper_frame() {
        let backend = MemoryBackend::default();

        log_from_helper(&backend);
        let line = line!() + 1;
        log_from_helper(&backend.with_caller_offset(1));

        let records = backend.records();
        assert_ne!(records[0].caller.line(), line);
        assert!(records[1].caller.file().ends_with("memory.rs"));
        assert_eq!(records[1].caller.line(), line, "{}", records[1].caller);
    }

    #[test]
    fn test_memory_backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryBackend>();
    }
}
