//! Chat target: who a message is sent to or read from

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A recipient or chat identifier understood by the engine
///
/// Either a phone number (stored as digits, without `+` or separators) or a
/// full JID such as `120363025246125486@g.us`, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChatTarget {
    value: String,
}

impl ChatTarget {
    /// Parse a chat target from user input
    pub fn new(identifier: impl Into<String>) -> Result<Self, DomainError> {
        let raw = identifier.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidChatTarget(
                "chat identifier must not be empty".to_string(),
            ));
        }

        if let Some((user, server)) = trimmed.split_once('@') {
            if user.is_empty() || server.is_empty() || trimmed.chars().any(char::is_whitespace) {
                return Err(DomainError::InvalidChatTarget(format!(
                    "{trimmed} is not a valid JID"
                )));
            }
            return Ok(Self {
                value: trimmed.to_string(),
            });
        }

        let cleaned = trimmed.replace([' ', '-', '(', ')'], "");
        let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidChatTarget(format!(
                "{trimmed} is neither a phone number nor a JID"
            )));
        }

        Ok(Self {
            value: digits.to_string(),
        })
    }

    /// The identifier as sent to the engine
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether this target is a full JID rather than a bare phone number
    pub fn is_jid(&self) -> bool {
        self.value.contains('@')
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for ChatTarget {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ChatTarget {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChatTarget> for String {
    fn from(value: ChatTarget) -> Self {
        value.value
    }
}
