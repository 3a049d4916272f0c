//! Infrastructure layer - Adapters for external systems
//!
//! Implements the bridge port on top of the WhatsApp engine gateway and
//! provides configuration loading and log initialization for the binaries.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, EngineConfig, GatewayConfig, LogFormat, LoggingConfig};
pub use telemetry::{TelemetryError, init_logging};
