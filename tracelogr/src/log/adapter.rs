//! Sink adapter over a structured backend.

use super::r#trait::{LogSink, Underlier};
use crate::backend::Backend;
use crate::config::{SinkConfig, SinkOption};
use crate::field::{Field, Value};
use crate::level::Severity;
use std::any::Any;
use std::error::Error;
use std::panic::Location;

/// [`LogSink`] implementation that translates every call onto a [`Backend`].
///
/// - `info` prepends the verbosity field and picks `Info` for level 0 or
///   below, `Debug` above it
/// - `error` prepends the error text when there is an error value and
///   always emits at `Error`
/// - names are kept as the backend prefix, joined with the configured
///   separator
#[derive(Debug, Clone)]
pub struct BackendSink<B> {
    backend: B,
    config: SinkConfig,
}

impl<B: Backend> BackendSink<B> {
    /// Wrap `backend` with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SinkConfig::default())
    }

    /// Wrap `backend`, applying `options` over the defaults in order.
    pub fn with_options(backend: B, options: impl IntoIterator<Item = SinkOption>) -> Self {
        Self::with_config(backend, SinkConfig::default().apply_all(options))
    }

    pub fn with_config(backend: B, config: SinkConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    fn derive(&self, backend: B) -> Box<dyn LogSink> {
        Box::new(Self {
            backend,
            config: self.config.clone(),
        })
    }

    fn joined_name(&self, name: &str) -> String {
        let current = self.backend.prefix();
        if current.is_empty() {
            name.to_string()
        } else {
            format!("{}{}{}", current, self.config.name_separator(), name)
        }
    }
}

/// Copy of `fields` with `(key, value)` in front.
fn prepend(key: &str, value: Value, fields: &[Field]) -> Vec<Field> {
    let mut all = Vec::with_capacity(fields.len() + 1);
    all.push(Field::new(key, value));
    all.extend_from_slice(fields);
    all
}

impl<B: Backend> LogSink for BackendSink<B> {
    fn enabled(&self, level: i32) -> bool {
        Severity::from_verbosity(level) >= self.backend.level()
    }

    fn info_at(
        &self,
        level: i32,
        msg: &str,
        fields: &[Field],
        caller: &'static Location<'static>,
    ) {
        let severity = Severity::from_verbosity(level);
        let verbosity_key = self.config.verbosity_field_name();

        if verbosity_key.is_empty() {
            self.backend.log(severity, msg, fields, caller);
        } else {
            let fields = prepend(verbosity_key, Value::from(level), fields);
            self.backend.log(severity, msg, &fields, caller);
        }
    }

    fn error_at(
        &self,
        err: Option<&dyn Error>,
        msg: &str,
        fields: &[Field],
        caller: &'static Location<'static>,
    ) {
        match err {
            Some(err) => {
                let fields = prepend(
                    self.config.error_field_name(),
                    Value::display(err),
                    fields,
                );
                self.backend.log(Severity::Error, msg, &fields, caller);
            }
            None => self.backend.log(Severity::Error, msg, fields, caller),
        }
    }

    fn with_values(&self, fields: &[Field]) -> Box<dyn LogSink> {
        self.derive(self.backend.with_fields(fields))
    }

    fn with_name(&self, name: &str) -> Box<dyn LogSink> {
        let joined = self.joined_name(name);
        self.derive(self.backend.with_prefix(&joined))
    }

    fn with_call_depth(&self, depth: usize) -> Box<dyn LogSink> {
        let offset = self.backend.caller_offset().saturating_add(depth);
        self.derive(self.backend.with_caller_offset(offset))
    }

    fn call_stack_helper(&self) -> fn() {
        self.backend.helper()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<B: Backend> Underlier for BackendSink<B> {
    type Backend = B;

    fn underlying(&self) -> &B {
        &self.backend
    }
}
