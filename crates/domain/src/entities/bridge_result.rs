//! Bridge result - The structured response returned by the engine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status marker of a result: `"ok"` or anything else
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultStatus {
    /// The engine completed the request
    Ok,
    /// The engine reported a failure; holds the raw status marker
    Failed(String),
}

impl ResultStatus {
    /// Wire value for a successful call
    pub const OK: &'static str = "ok";

    /// Whether this status is the success marker
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Raw wire value
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => Self::OK,
            Self::Failed(marker) => marker,
        }
    }
}

impl From<String> for ResultStatus {
    fn from(value: String) -> Self {
        if value == Self::OK {
            Self::Ok
        } else {
            Self::Failed(value)
        }
    }
}

impl From<ResultStatus> for String {
    fn from(value: ResultStatus) -> Self {
        match value {
            ResultStatus::Ok => ResultStatus::OK.to_string(),
            ResultStatus::Failed(marker) => marker,
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response payload produced by the bridge engine
///
/// Unknown keys are ignored. A payload without `status` does not decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResult {
    /// `"ok"` or an error marker
    pub status: ResultStatus,

    /// Human-readable failure message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Identifier of the message that was sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Whether the account had to be paired via QR code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_qr: Option<bool>,

    /// Messages collected during the session, oldest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_messages: Option<Vec<String>>,
}

impl BridgeResult {
    /// Fallback message for failures that carry no `error`
    pub const UNKNOWN_ERROR: &'static str = "unknown bridge error";

    /// A bare successful result
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: ResultStatus::Ok,
            error: None,
            message_id: None,
            requires_qr: None,
            last_messages: None,
        }
    }

    /// A failed result with the conventional `"error"` marker
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Failed("error".to_string()),
            error: Some(message.into()),
            ..Self::ok()
        }
    }

    /// Whether the engine reported success
    pub const fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Engine-supplied failure message, or a generic fallback
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or(Self::UNKNOWN_ERROR)
    }

    /// Whether login pairing was needed (absent means no)
    pub fn requires_qr(&self) -> bool {
        self.requires_qr.unwrap_or(false)
    }

    /// Collected messages (absent means none)
    pub fn last_messages(&self) -> &[String] {
        self.last_messages.as_deref().unwrap_or_default()
    }
}
