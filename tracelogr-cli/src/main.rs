//! tracelogr CLI - Command-line demonstration of the sink adapter
//!
//! Installs a subscriber with the requested formatter and emits the
//! canonical example records through the adapter.

mod error;
mod runner;

use clap::{Parser, ValueEnum};
use runner::{CliRunner, RunnerConfig};
use std::path::PathBuf;
use tracelogr::logging::{default_log_path, LogFormat};
use tracelogr::Severity;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
enum FormatArg {
    /// Full human-readable lines
    Text,
    /// key=value pairs only
    Logfmt,
    /// One JSON object per line
    Json,
}

impl From<FormatArg> for LogFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => LogFormat::Text,
            FormatArg::Logfmt => LogFormat::Logfmt,
            FormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tracelogr")]
#[command(version = tracelogr::VERSION)]
#[command(about = "Emit example records through the tracelogr sink adapter", long_about = None)]
struct Args {
    /// Output formatter
    #[arg(long, value_enum, default_value = "text")]
    format: FormatArg,

    /// Backend threshold (debug, info, warn, error)
    #[arg(long, default_value = "info")]
    level: Severity,

    /// Name segment appended to the logger; repeat to nest
    #[arg(long = "name", value_name = "SEGMENT")]
    names: Vec<String>,

    /// Key of the verbosity field (empty disables it)
    #[arg(long, value_name = "NAME")]
    verbosity_field: Option<String>,

    /// Key of the error field
    #[arg(long, value_name = "NAME")]
    error_field: Option<String>,

    /// Separator placed between name segments
    #[arg(long, value_name = "SEP")]
    separator: Option<String>,

    /// Attach the source location of each logging call
    #[arg(long)]
    report_caller: bool,

    /// Omit timestamps from rendered records
    #[arg(long)]
    no_timestamps: bool,

    /// Write records to this file instead of stdout
    /// (logs/tracelogr.log when no path is given)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,
}

impl From<Args> for RunnerConfig {
    fn from(args: Args) -> Self {
        RunnerConfig {
            format: args.format.into(),
            level: args.level,
            names: args.names,
            verbosity_field: args.verbosity_field,
            error_field: args.error_field,
            separator: args.separator,
            report_caller: args.report_caller,
            timestamps: !args.no_timestamps,
            log_file: args
                .log_file
                .map(|path| path.unwrap_or_else(default_log_path)),
        }
    }
}

fn main() {
    let config = RunnerConfig::from(Args::parse());

    let runner = match CliRunner::new(&config) {
        Ok(runner) => runner,
        Err(e) => e.exit(),
    };
    runner.run();
}
