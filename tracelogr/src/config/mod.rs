//! Configuration for the sink adapter.
//!
//! Field names and the name separator are set at construction, either with
//! [`SinkConfig`]'s builder methods or with a list of [`SinkOption`]s applied
//! over the defaults in order.
//!
//! # Example
//!
//! ```
//! use tracelogr::config::{with_name_separator, with_verbosity_field_name, SinkConfig};
//!
//! let config = SinkConfig::default()
//!     .apply_all([with_verbosity_field_name("verbosity"), with_name_separator(".")]);
//! assert_eq!(config.verbosity_field_name(), "verbosity");
//! assert_eq!(config.error_field_name(), "err");
//! assert_eq!(config.name_separator(), ".");
//! ```

pub mod defaults;
mod sink;

pub use defaults::{DEFAULT_ERROR_FIELD_NAME, DEFAULT_NAME_SEPARATOR, DEFAULT_VERBOSITY_FIELD_NAME};
pub use sink::{
    with_error_field_name, with_name_separator, with_verbosity_field_name, SinkConfig, SinkOption,
};
