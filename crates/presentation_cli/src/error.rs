//! CLI error type
//!
//! Every variant renders as a one-line diagnostic starting with its category.

use application::ApplicationError;
use domain::DomainError;
use infrastructure::TelemetryError;
use integration_whatsapp::GatewayError;
use thiserror::Error;

/// Errors that end a `wa-bridge` run with exit code 1
#[derive(Debug, Error)]
pub enum CliError {
    /// Flags are missing or contradictory
    #[error("Invalid request: {0}")]
    Usage(String),

    /// A flag value failed domain validation
    #[error("Invalid request: {0}")]
    Invalid(#[from] DomainError),

    /// Config file or environment could not be read
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging could not be set up
    #[error("Configuration error: {0}")]
    Logging(#[from] TelemetryError),

    /// The engine library could not be loaded
    #[error(transparent)]
    Library(#[from] GatewayError),

    /// The bridge call failed
    #[error("{}", describe(.0))]
    Application(#[from] ApplicationError),
}

fn describe(err: &ApplicationError) -> String {
    match err {
        ApplicationError::Domain(inner) => format!("{}: {inner}", err.category()),
        other => other.to_string(),
    }
}
