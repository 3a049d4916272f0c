//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid account phone number
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    /// Invalid recipient or chat identifier
    #[error("Invalid chat target: {0}")]
    InvalidChatTarget(String),

    /// Invalid storage connection descriptor
    #[error("Invalid connection URI: {0}")]
    InvalidConnectionUri(String),

    /// Command is inconsistent or carries out-of-range values
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
