//! `tracing-subscriber` initialization

use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Filter used when neither `RUST_LOG` nor a configured level is present
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Error type for log initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter {
        /// Offending directive
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Build the effective filter
///
/// `RUST_LOG` wins over `level`; `level` wins over [`DEFAULT_LOG_FILTER`].
pub fn log_filter(
    rust_log: Option<&str>,
    level: Option<&str>,
) -> Result<EnvFilter, TelemetryError> {
    let directive = rust_log
        .filter(|s| !s.trim().is_empty())
        .or(level)
        .unwrap_or(DEFAULT_LOG_FILTER);

    EnvFilter::try_new(directive).map_err(|e| TelemetryError::Filter {
        filter: directive.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber
///
/// Call once, early in `main`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), config.level.as_deref())?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))?;

    debug!(format = %config.format, "Logging initialized");
    Ok(())
}
