//! Connection descriptor for the engine's session store

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Storage connection URI handed to the engine (e.g., a SQLite DSN)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectionUri {
    value: String,
}

impl ConnectionUri {
    /// URI the engine falls back to when none is given
    pub const DEFAULT: &'static str = "file:whatsapp.db?_foreign_keys=on";

    /// Create a connection URI; blank input selects [`Self::DEFAULT`]
    pub fn new(uri: impl Into<String>) -> Result<Self, DomainError> {
        let uri = uri.into();
        let trimmed = uri.trim();

        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        if trimmed.contains('\0') {
            return Err(DomainError::InvalidConnectionUri(
                "URI must not contain NUL bytes".to_string(),
            ));
        }

        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// The URI as passed across the boundary
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Default for ConnectionUri {
    fn default() -> Self {
        Self {
            value: Self::DEFAULT.to_string(),
        }
    }
}

impl fmt::Display for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for ConnectionUri {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConnectionUri> for String {
    fn from(value: ConnectionUri) -> Self {
        value.value
    }
}
