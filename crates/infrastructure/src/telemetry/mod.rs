//! Log subscriber setup
//!
//! Logs are written to stderr so stdout stays free for command output.

mod subscriber;

pub use subscriber::{TelemetryError, init_logging, log_filter};
