//! Error types for the bridge gateway

use thiserror::Error;

/// Errors that can occur while calling the bridge engine
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The engine returned no response buffer
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response buffer is not a valid result document
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The engine answered with a failure status
    #[error("Bridge error: {0}")]
    Bridge(String),

    /// The request cannot be passed across the C boundary
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The shared library could not be loaded or lacks a symbol
    #[error("Library error: {0}")]
    Library(String),
}

impl GatewayError {
    /// Create a transport error
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a protocol error
    #[must_use]
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a bridge error
    #[must_use]
    pub fn bridge(msg: impl Into<String>) -> Self {
        Self::Bridge(msg.into())
    }

    /// Create an invalid request error
    #[must_use]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a library error
    #[must_use]
    pub fn library(msg: impl Into<String>) -> Self {
        Self::Library(msg.into())
    }

    /// Whether the engine was reached and produced a response
    #[must_use]
    pub const fn engine_responded(&self) -> bool {
        matches!(self, Self::Protocol(_) | Self::Bridge(_))
    }
}
