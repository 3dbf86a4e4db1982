//! Event formatter that renders records with their fields as top-level keys.
//!
//! The [`TracingBackend`](crate::backend::TracingBackend) packs a record's
//! fields into one `kv` event field. [`RecordFormat`] unpacks it, so every
//! field is rendered on its own in whichever style is selected:
//!
//! ```text
//! text:   2024-01-02T03:04:05Z INFO <src/main.rs:9:5> json-logger: some message v=0
//! logfmt: time=2024-01-02T03:04:05Z level=info prefix=json-logger msg="some message" v=0
//! json:   {"time":"2024-01-02T03:04:05Z","level":"info","prefix":"json-logger","msg":"some message","v":0}
//! ```
//!
//! Events from other targets go through the same path, with their own
//! fields in recording order.

use crate::backend::FIELDS_KEY;
use crate::field::{decode_fields, Field, FieldsDisplay, Value};
use crate::logging::LogFormat;
use serde_json::Value as Json;
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::field::{Field as EventField, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Shared timestamp source.
///
/// Wraps any [`FormatTime`], including plain
/// `fn(&mut Writer<'_>) -> fmt::Result` functions, so a fixed or custom
/// clock can be plugged into the formatter.
#[derive(Clone)]
pub struct Timer(Arc<dyn FormatTime + Send + Sync>);

impl Timer {
    pub fn new(timer: impl FormatTime + Send + Sync + 'static) -> Self {
        Self(Arc::new(timer))
    }

    /// Render the current time into a string.
    pub fn now(&self) -> Result<String, fmt::Error> {
        let mut buf = String::new();
        self.0.format_time(&mut Writer::new(&mut buf))?;
        Ok(buf)
    }
}

/// RFC 3339 wall-clock time.
impl Default for Timer {
    fn default() -> Self {
        Self::new(SystemTime)
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Timer")
    }
}

/// [`FormatEvent`] for the three output styles of [`LogFormat`].
#[derive(Debug, Clone, Default)]
pub struct RecordFormat {
    style: LogFormat,
    timer: Option<Timer>,
}

impl RecordFormat {
    pub fn new(style: LogFormat) -> Self {
        Self { style, timer: None }
    }

    /// Prefix every record with the time `timer` renders.
    pub fn with_timer(mut self, timer: Timer) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Leave the timestamp off.
    pub fn without_time(mut self) -> Self {
        self.timer = None;
        self
    }

    fn write_text(&self, w: &mut Writer<'_>, level: &Level, parts: &RecordParts) -> fmt::Result {
        if let Some(time) = &parts.time {
            write!(w, "{} ", time)?;
        }
        let label = level.as_str();
        if w.has_ansi_escapes() {
            write!(w, "\x1b[1;{}m{}\x1b[0m", level_color(level), label)?;
        } else {
            w.write_str(label)?;
        }
        if let Some(caller) = &parts.caller {
            write!(w, " <{}>", caller)?;
        }
        if let Some(prefix) = &parts.prefix {
            write!(w, " {}:", prefix)?;
        }
        write!(w, " {}", parts.message)?;

        let groups: [&[Field]; 1] = [&parts.fields];
        let fields = FieldsDisplay::new(&groups);
        if !fields.is_empty() {
            write!(w, " {}", fields)?;
        }
        Ok(())
    }

    fn write_logfmt(&self, w: &mut Writer<'_>, level: &Level, parts: &RecordParts) -> fmt::Result {
        let mut head = Vec::with_capacity(5);
        if let Some(time) = &parts.time {
            head.push(Field::new("time", time.as_str()));
        }
        head.push(Field::new("level", level_name(level)));
        if let Some(caller) = &parts.caller {
            head.push(Field::new("caller", caller.as_str()));
        }
        if let Some(prefix) = &parts.prefix {
            head.push(Field::new("prefix", prefix.as_str()));
        }
        head.push(Field::new("msg", parts.message.as_str()));

        let groups: [&[Field]; 2] = [&head, &parts.fields];
        write!(w, "{}", FieldsDisplay::new(&groups))
    }

    fn write_json(&self, w: &mut Writer<'_>, level: &Level, parts: &RecordParts) -> fmt::Result {
        let mut entries: Vec<(&str, Json)> = Vec::with_capacity(parts.fields.len() + 5);
        if let Some(time) = &parts.time {
            entries.push(("time", Json::from(time.as_str())));
        }
        entries.push(("level", Json::from(level_name(level))));
        if let Some(caller) = &parts.caller {
            entries.push(("caller", Json::from(caller.as_str())));
        }
        if let Some(prefix) = &parts.prefix {
            entries.push(("prefix", Json::from(prefix.as_str())));
        }
        entries.push(("msg", Json::from(parts.message.as_str())));
        entries.extend(
            parts
                .fields
                .iter()
                .map(|field| (field.key(), field.value().to_json())),
        );

        w.write_char('{')?;
        for (i, (key, value)) in entries.iter().enumerate() {
            if i > 0 {
                w.write_char(',')?;
            }
            write!(w, "{}:{}", Json::from(*key), value)?;
        }
        w.write_char('}')
    }
}

impl<S, N> FormatEvent<S, N> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut parts = RecordParts::default();
        event.record(&mut parts);
        parts.time = match &self.timer {
            Some(timer) => Some(timer.now()?),
            None => None,
        };

        let level = event.metadata().level();
        match self.style {
            LogFormat::Text => self.write_text(&mut writer, level, &parts)?,
            LogFormat::Logfmt => self.write_logfmt(&mut writer, level, &parts)?,
            LogFormat::Json => self.write_json(&mut writer, level, &parts)?,
        }
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        _ => "error",
    }
}

fn level_color(level: &Level) -> u8 {
    match *level {
        Level::TRACE => 35,
        Level::DEBUG => 34,
        Level::INFO => 32,
        Level::WARN => 33,
        _ => 31,
    }
}

/// Pieces of one event, collected from its fields.
#[derive(Debug, Default)]
struct RecordParts {
    time: Option<String>,
    message: String,
    prefix: Option<String>,
    caller: Option<String>,
    fields: Vec<Field>,
}

impl Visit for RecordParts {
    fn record_str(&mut self, field: &EventField, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "prefix" => self.prefix = Some(value.to_string()),
            "caller" => self.caller = Some(value.to_string()),
            FIELDS_KEY => match decode_fields(value) {
                Some(fields) => self.fields.extend(fields),
                None => self.fields.push(Field::new(FIELDS_KEY, value)),
            },
            name => self.fields.push(Field::new(name, value)),
        }
    }

    fn record_i64(&mut self, field: &EventField, value: i64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &EventField, value: u64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &EventField, value: f64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_bool(&mut self, field: &EventField, value: bool) {
        self.fields.push(Field::new(field.name(), Value::Bool(value)));
    }

    fn record_debug(&mut self, field: &EventField, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }
}
