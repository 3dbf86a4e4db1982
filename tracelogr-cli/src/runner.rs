//! CLI runner for logging setup and the demo session.
//!
//! Installs the subscriber, builds the adapter over the tracing backend and
//! emits the demonstration records.

use crate::error::CliError;
use std::io;
use tracelogr::backend::{TracingBackend, TracingOptions};
use tracelogr::config::{
    with_error_field_name, with_name_separator, with_verbosity_field_name, SinkOption,
};
use tracelogr::logging::{init_logging, LogFormat, LoggingConfig, LoggingGuard};
use tracelogr::{kv, new_logger_with_options, Logger, Severity};
use tracing::info;

/// Everything the runner needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub format: LogFormat,
    pub level: Severity,
    pub names: Vec<String>,
    pub verbosity_field: Option<String>,
    pub error_field: Option<String>,
    pub separator: Option<String>,
    pub report_caller: bool,
    pub timestamps: bool,
    pub log_file: Option<std::path::PathBuf>,
}

impl RunnerConfig {
    /// Adapter options for the fields that were given, in flag order.
    pub fn sink_options(&self) -> Vec<SinkOption> {
        let mut options = Vec::new();
        if let Some(name) = &self.verbosity_field {
            options.push(with_verbosity_field_name(name.as_str()));
        }
        if let Some(name) = &self.error_field {
            options.push(with_error_field_name(name.as_str()));
        }
        if let Some(sep) = &self.separator {
            options.push(with_name_separator(sep.as_str()));
        }
        options
    }

    /// Subscriber configuration. The filter follows the backend threshold so
    /// the subscriber never drops what the backend lets through.
    pub fn logging_config(&self) -> LoggingConfig {
        let config = LoggingConfig::default()
            .with_format(self.format)
            .with_filter(self.level.as_str())
            .with_timestamps(self.timestamps);
        match &self.log_file {
            Some(path) => config.with_file(path.clone()),
            None => config,
        }
    }

    fn validate(&self) -> Result<(), CliError> {
        if let Some(empty) = self.names.iter().position(|name| name.is_empty()) {
            return Err(CliError::Config(format!(
                "--name occurrence {} is empty",
                empty + 1
            )));
        }
        Ok(())
    }
}

/// Runner that manages the CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps the file writer flushing while the runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    logger: Logger,
}

impl CliRunner {
    /// Validate the configuration, install logging and build the logger.
    pub fn new(config: &RunnerConfig) -> Result<Self, CliError> {
        config.validate()?;
        let logging_guard = init_logging(&config.logging_config())?;

        info!("tracelogr v{}", tracelogr::VERSION);

        Ok(Self {
            logging_guard,
            logger: build_logger(config),
        })
    }

    /// Emit the demonstration records.
    pub fn run(&self) {
        emit_demo(&self.logger);
    }
}

/// Logger over a tracing backend, named by every `--name` in order.
pub fn build_logger(config: &RunnerConfig) -> Logger {
    let backend = TracingBackend::with_options(
        TracingOptions::new()
            .with_level(config.level)
            .with_report_caller(config.report_caller),
    );
    config
        .names
        .iter()
        .fold(new_logger_with_options(backend, config.sink_options()), |logger, name| {
            logger.with_name(name)
        })
}

/// The four canonical records: info, `v(1)` debug, error with a value and
/// error without one.
pub fn emit_demo(logger: &Logger) {
    let whoops = io::Error::new(io::ErrorKind::Other, "whoops");

    logger.info("info msg", &[]);
    logger.v(1).info("debug message", &[]);
    logger.error(Some(&whoops), "additional msg", &kv!["key" => "value"]);
    logger.error(None, "no error but err level", &[]);
}
