//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// `Transport`, `Protocol` and `Bridge` mirror the three failure modes of a
/// bridge call and are never folded into one another.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level validation error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The engine produced no response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The engine response could not be decoded
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The engine reported a failure status
    #[error("Bridge error: {0}")]
    Bridge(String),

    /// The request could not be sent across the boundary
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Short label used as the prefix of user-facing diagnostics
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Domain(_) | Self::InvalidRequest(_) => "Invalid request",
            Self::Transport(_) => "Transport error",
            Self::Protocol(_) => "Protocol error",
            Self::Bridge(_) => "Bridge error",
            Self::Configuration(_) => "Configuration error",
        }
    }
}
