//! Logging infrastructure: installs the `tracing` subscriber that renders
//! everything the [`TracingBackend`](crate::backend::TracingBackend) emits.
//!
//! - Text, logfmt or JSON output through [`RecordFormat`]
//! - Pluggable timestamp source
//! - Stdout, or a file cleared at session start and written off-thread
//! - Configurable via the RUST_LOG environment variable

use crate::config::defaults::{DEFAULT_FILTER_DIRECTIVE, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use crate::format::{RecordFormat, Timer};
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Output style for rendered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines: `LEVEL prefix: message k=v`
    #[default]
    Text,
    /// `key=value` pairs only: `level=info prefix=.. msg=.. k=v`
    Logfmt,
    /// One JSON object per line, fields as top-level keys
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Logfmt => f.write_str("logfmt"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Error parsing a log format name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid log format '{input}' - expected text, logfmt or json")]
pub struct ParseFormatError {
    input: String,
}

impl FromStr for LogFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "logfmt" => Ok(LogFormat::Logfmt),
            "json" => Ok(LogFormat::Json),
            _ => Err(ParseFormatError {
                input: s.to_string(),
            }),
        }
    }
}

/// Logging initialisation errors.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Log directory or file could not be prepared
    #[error("Failed to prepare log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configured filter directive did not parse
    #[error("Invalid filter directive '{directive}': {source}")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },

    /// RUST_LOG was set but did not parse
    #[error("Invalid RUST_LOG value '{directive}': {source}")]
    EnvFilter {
        directive: String,
        #[source]
        source: ParseError,
    },

    /// A global subscriber was already installed
    #[error("Failed to install global subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Settings for [`init_logging`].
///
/// # Example
///
/// ```
/// use tracelogr::logging::{LogFormat, LoggingConfig};
///
/// let config = LoggingConfig::default()
///     .with_format(LogFormat::Json)
///     .with_filter("debug")
///     .with_timestamps(false);
/// assert_eq!(config.format(), LogFormat::Json);
/// assert_eq!(config.filter(), "debug");
/// assert!(config.file().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    format: LogFormat,
    /// Directive used when RUST_LOG is unset
    filter: String,
    ansi: bool,
    timestamps: bool,
    timer: Timer,
    /// Stdout when `None`
    file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filter(mut self, directive: impl Into<String>) -> Self {
        self.filter = directive.into();
        self
    }

    /// ANSI colors; always off for file output.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Source of record timestamps. Defaults to RFC 3339 wall-clock time.
    ///
    /// ```
    /// use std::fmt;
    /// use tracelogr::logging::LoggingConfig;
    /// use tracing_subscriber::fmt::format::Writer;
    ///
    /// fn fixed(w: &mut Writer<'_>) -> fmt::Result {
    ///     w.write_str("1996/03/24 01:02:03")
    /// }
    ///
    /// let config = LoggingConfig::default()
    ///     .with_timer(fixed as fn(&mut Writer<'_>) -> fmt::Result);
    /// assert_eq!(config.timer().now().unwrap(), "1996/03/24 01:02:03");
    /// ```
    pub fn with_timer(mut self, timer: impl FormatTime + Send + Sync + 'static) -> Self {
        self.timer = Timer::new(timer);
        self
    }

    /// Write to `path` instead of stdout.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn ansi(&self) -> bool {
        self.ansi
    }

    pub fn timestamps(&self) -> bool {
        self.timestamps
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Event formatter for this configuration.
    pub fn record_format(&self) -> RecordFormat {
        let format = RecordFormat::new(self.format);
        if self.timestamps {
            format.with_timer(self.timer.clone())
        } else {
            format
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: DEFAULT_FILTER_DIRECTIVE.to_string(),
            ansi: true,
            timestamps: true,
            timer: Timer::default(),
            file: None,
        }
    }
}

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Build the fmt layer described by `config`, writing to `writer`.
///
/// The file setting of `config` is ignored; the caller picks the writer.
pub fn fmt_layer<S>(
    config: &LoggingConfig,
    writer: BoxMakeWriter,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    tracing_subscriber::fmt::layer::<S>()
        .with_writer(writer)
        .with_ansi(config.ansi)
        .event_format(config.record_format())
        .boxed()
}

/// Filter from the RUST_LOG value when there is one, else from `configured`.
///
/// An unparsable RUST_LOG is an error rather than silently ignored.
pub fn build_filter(
    env_value: Option<&str>,
    configured: &str,
) -> Result<EnvFilter, LoggingError> {
    match env_value {
        Some(directive) => {
            EnvFilter::try_new(directive).map_err(|source| LoggingError::EnvFilter {
                directive: directive.to_string(),
                source,
            })
        }
        None => EnvFilter::try_new(configured).map_err(|source| LoggingError::Filter {
            directive: configured.to_string(),
            source,
        }),
    }
}

/// Clear `path` and open a non-blocking writer appending to it.
///
/// Creates the parent directory if needed. The returned guard must outlive
/// every write.
pub fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let io_error = |source: io::Error| LoggingError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "log path has no file name",
        ))
    })?;

    fs::create_dir_all(dir).map_err(io_error)?;
    // Start each session with an empty file
    fs::write(path, "").map_err(io_error)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber described by `config`.
///
/// RUST_LOG takes precedence over the configured filter directive.
///
/// # Errors
///
/// Fails if the log file cannot be prepared, a directive does not parse,
/// or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    let env_value = env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env_value.as_deref(), &config.filter)?;

    let (writer, file_guard) = match &config.file {
        Some(path) => {
            let (non_blocking, guard) = file_writer(path)?;
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(io::stdout), None),
    };
    let layer_config = config.clone().with_ansi(config.ansi && config.file.is_none());

    let layer = fmt_layer::<Registry>(&layer_config, writer);
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Default log file location: `logs/tracelogr.log`.
pub fn default_log_path() -> PathBuf {
    Path::new(DEFAULT_LOG_DIR).join(DEFAULT_LOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{TracingBackend, TracingOptions};
    use crate::log::new_logger;
    use crate::test_support::CaptureWriter;
    use tracing_subscriber::fmt::format::Writer;

    fn quiet(format: LogFormat) -> LoggingConfig {
        LoggingConfig::default()
            .with_format(format)
            .with_timestamps(false)
            .with_ansi(false)
    }

    fn render(config: &LoggingConfig, emit: impl FnOnce()) -> String {
        let writer = CaptureWriter::default();
        let layer = fmt_layer::<Registry>(config, BoxMakeWriter::new(writer.clone()));
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, emit);
        writer.contents()
    }

    #[derive(Debug)]
    struct Whoops;

    impl fmt::Display for Whoops {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("whoops")
        }
    }

    impl std::error::Error for Whoops {}

    #[test]
    fn test_default_log_path() {
        assert_eq!(default_log_path(), Path::new("logs").join("tracelogr.log"));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert_eq!("plain".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert_eq!("logfmt".parse::<LogFormat>(), Ok(LogFormat::Logfmt));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("compact".parse::<LogFormat>().is_err());
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_format_display_roundtrip() {
        for format in [LogFormat::Text, LogFormat::Logfmt, LogFormat::Json] {
            assert_eq!(format.to_string().parse::<LogFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.format(), LogFormat::Text);
        assert_eq!(config.filter(), DEFAULT_FILTER_DIRECTIVE);
        assert!(config.ansi());
        assert!(config.timestamps());
        assert!(config.file().is_none());
    }

    #[test]
    fn test_json_layer_puts_fields_at_top_level() {
        let logger = new_logger(TracingBackend::new());
        let output = render(&quiet(LogFormat::Json), || {
            logger.with_name("json-logger").info("some message", &[]);
            logger.error(Some(&Whoops), "log line with error", &[]);
        });
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            r#"{"level":"info","prefix":"json-logger","msg":"some message","v":0}"#
        );
        assert_eq!(
            lines[1],
            r#"{"level":"error","msg":"log line with error","err":"whoops"}"#
        );
    }

    #[test]
    fn test_logfmt_layer_renders_pairs_only() {
        let logger = new_logger(TracingBackend::new()).with_name("svc");
        let output = render(&quiet(LogFormat::Logfmt), || {
            logger.info("some message", &[]);
        });
        assert_eq!(output, "level=info prefix=svc msg=\"some message\" v=0\n");
    }

    #[test]
    fn test_text_layer_renders_fields_without_wrapper() {
        let logger = new_logger(TracingBackend::new());
        let output = render(&quiet(LogFormat::Text), || {
            logger.error(Some(&Whoops), "additional msg", &crate::kv!["key" => "value"]);
        });
        assert_eq!(output, "ERROR additional msg err=whoops key=value\n");
    }

    #[test]
    fn test_custom_timer_stamps_records() {
        fn fixed(w: &mut Writer<'_>) -> fmt::Result {
            w.write_str("1996/03/24 01:02:03")
        }

        let config = quiet(LogFormat::Text)
            .with_timestamps(true)
            .with_timer(fixed as fn(&mut Writer<'_>) -> fmt::Result);
        let logger = new_logger(TracingBackend::new());
        let output = render(&config, || logger.info("info msg", &[]));

        assert_eq!(output, "1996/03/24 01:02:03 INFO info msg v=0\n");
    }

    #[test]
    fn test_timer_ignored_without_timestamps() {
        fn fixed(w: &mut Writer<'_>) -> fmt::Result {
            w.write_str("1996/03/24 01:02:03")
        }

        let config = quiet(LogFormat::Text).with_timer(fixed as fn(&mut Writer<'_>) -> fmt::Result);
        let logger = new_logger(TracingBackend::new());
        let output = render(&config, || logger.info("info msg", &[]));

        assert_eq!(output, "INFO info msg v=0\n");
    }

    #[test]
    fn test_build_filter_prefers_env_value() {
        assert!(build_filter(Some("debug"), "info").is_ok());
        assert!(build_filter(None, "info").is_ok());
    }

    #[test]
    fn test_build_filter_reports_bad_env_value() {
        let err = build_filter(Some("tracelogr=loud"), "info").unwrap_err();
        assert!(matches!(err, LoggingError::EnvFilter { .. }), "{err}");
        assert!(err.to_string().contains("RUST_LOG"));
    }

    #[test]
    fn test_build_filter_reports_bad_configured_directive() {
        let err = build_filter(None, "tracelogr=loud").unwrap_err();
        assert!(matches!(err, LoggingError::Filter { .. }), "{err}");
    }

    #[test]
    fn test_file_writer_creates_and_clears() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("deep").join("test.log");

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "old log data").unwrap();

        let (_writer, guard) = file_writer(&path).expect("file writer");
        drop(guard);

        assert!(path.exists(), "Log file should exist");
        assert_eq!(fs::read_to_string(&path).unwrap(), "", "File should be cleared");
    }

    #[test]
    fn test_file_writer_receives_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("records.log");
        let (writer, guard) = file_writer(&path).expect("file writer");

        let layer = fmt_layer::<Registry>(&quiet(LogFormat::Text), BoxMakeWriter::new(writer));
        let subscriber = tracing_subscriber::registry().with(layer);
        let logger = new_logger(TracingBackend::with_options(
            TracingOptions::new().with_prefix("file"),
        ));
        tracing::subscriber::with_default(subscriber, || {
            logger.error(None, "written to disk", &[]);
        });
        drop(guard);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "ERROR file: written to disk\n");
    }

    #[test]
    fn test_file_writer_rejects_path_without_file_name() {
        let result = file_writer(Path::new("/"));
        assert!(matches!(result, Err(LoggingError::Io { .. })));
    }

    #[test]
    fn test_guard_structure() {
        let (non_blocking, guard) = NonBlocking::new(io::sink());
        drop(non_blocking);

        let _logging_guard = LoggingGuard {
            _file_guard: Some(guard),
        };
    }
}
