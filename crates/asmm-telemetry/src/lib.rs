//! Structured logging for the ASMM backtester.
//!
//! Pretty output for development, JSON lines when `RUST_ENV=production`.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogFormat, DEFAULT_FILTER};
