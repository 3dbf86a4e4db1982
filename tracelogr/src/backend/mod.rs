//! Concrete structured loggers the sink adapter can wrap.
//!
//! # Architecture
//!
//! - `Backend` trait: what the adapter needs from a concrete logger
//! - `TracingBackend`: production backend that emits `tracing` events
//! - `MemoryBackend`: records every emitted record for assertions
//! - `resolve_caller`: applies a handle's caller offset to the tracked call site
//!
//! Rendering, colors and output streams are the business of whatever
//! `tracing` subscriber is installed, not of the backends here.

mod caller;
mod memory;
mod tracing_adapter;
mod r#trait;

pub use caller::{resolve_caller, Caller};
pub use memory::{MemoryBackend, Record};
pub use r#trait::{noop_helper, Backend};
pub use tracing_adapter::{TracingBackend, TracingOptions, FIELDS_KEY, LOG_TARGET};
