//! Generic sink abstraction and the adapter that backs it with a
//! structured logger.
//!
//! # Architecture
//!
//! - `LogSink` trait: the generic leveled logging contract
//! - `BackendSink`: adapter translating sink calls onto a [`Backend`](crate::backend::Backend)
//! - `DiscardSink`: sink that drops everything
//! - `Logger`: caller-facing handle with verbosity levels
//!
//! # Usage
//!
//! Components accept a [`Logger`] and never see the backend:
//!
//! ```
//! use tracelogr::backend::MemoryBackend;
//! use tracelogr::{kv, new_logger, Logger};
//!
//! struct MyComponent {
//!     logger: Logger,
//! }
//!
//! impl MyComponent {
//!     fn new(logger: &Logger) -> Self {
//!         Self {
//!             logger: logger.with_name("component"),
//!         }
//!     }
//!
//!     fn do_work(&self) {
//!         self.logger.info("Starting work", &kv!["items" => 3]);
//!         self.logger.v(1).info("Work completed", &[]);
//!     }
//! }
//!
//! let backend = MemoryBackend::default();
//! MyComponent::new(&new_logger(backend.clone())).do_work();
//! assert_eq!(backend.lines(), vec!["INFO component: Starting work v=0 items=3"]);
//! ```

mod adapter;
mod logger;
mod noop;
mod r#trait;

pub use adapter::BackendSink;
pub use logger::{
    new_log_sink, new_log_sink_with_options, new_logger, new_logger_with_options, Logger,
};
pub use noop::DiscardSink;
pub use r#trait::{LogSink, RuntimeInfo, Underlier};
