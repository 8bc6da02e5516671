//! Runtime module - the bridge to the embedded Rhai engine
//!
//! The bridge owns the load → ready → run → capture → restore → idle
//! lifecycle:
//! - [`Loader`] initializes the engine once, preloading the library modules
//!   and installing the stream-capture shim, with progress checkpoints for
//!   the UI.
//! - [`Session`] is the process-wide execution context: single-flight runs,
//!   output capture with guaranteed stream restoration, persistent top-level
//!   scope.
//! - Scripts see the preloaded `math::*` / `text::*` libraries and the
//!   `finch::config::*` namespace.

mod api;
mod capture;
mod error;
mod loader;
mod session;

pub use capture::{CaptureBuffer, OutputSink, StderrSink, StdoutSink, StreamSlots};
pub use error::{LoadError, RunError};
pub use loader::{DEFAULT_LIBRARIES, Loader};
pub use session::{ExecutionResult, Outcome, Session};
