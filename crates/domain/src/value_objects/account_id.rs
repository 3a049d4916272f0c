//! Account identifier: the phone number the engine session belongs to

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A WhatsApp account phone number in international format without `+`
/// (e.g., `491234567890`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId {
    value: String,
}

impl AccountId {
    /// Create a new account id, normalizing and validating the number
    ///
    /// Accepted input:
    /// - optional leading `+`
    /// - separators (space, `-`, `(`, `)`) are stripped
    /// - 7-15 digits remain
    pub fn new(number: impl Into<String>) -> Result<Self, DomainError> {
        let cleaned = number.into().trim().replace([' ', '-', '(', ')'], "");
        let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

        if digits.is_empty() {
            return Err(DomainError::InvalidPhoneNumber(
                "phone number is required".to_string(),
            ));
        }

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidPhoneNumber(format!(
                "{digits} must contain only digits"
            )));
        }

        if digits.len() < 7 || digits.len() > 15 {
            return Err(DomainError::InvalidPhoneNumber(format!(
                "{digits} must have 7-15 digits"
            )));
        }

        Ok(Self {
            value: digits.to_string(),
        })
    }

    /// Digits of the number, without `+`
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for AccountId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for AccountId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.value
    }
}
