//! Bridge command - The structured request sent to the engine per invocation
//!
//! Every field is optional; absent fields are not serialized so the engine
//! applies its own defaults. A command with no fields at all is equivalent to
//! no command (a status check).

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::ChatTarget;

/// Request payload understood by the bridge engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeCommand {
    /// Text body to send
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_text: Option<String>,

    /// Destination of `send_text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChatTarget>,

    /// Chat to collect messages from (defaults to `recipient`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_chat: Option<ChatTarget>,

    /// Maximum number of messages to collect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_limit: Option<u32>,

    /// How long the engine listens for messages, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_seconds: Option<f64>,

    /// Print QR codes when login is required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_qr: Option<bool>,

    /// Clear the stored session and request a new link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_relink: Option<bool>,
}

impl BridgeCommand {
    /// Send `text` to `recipient`, reading replies from the same chat
    #[must_use]
    pub fn send(recipient: ChatTarget, text: impl Into<String>) -> Self {
        Self {
            send_text: Some(text.into()),
            read_chat: Some(recipient.clone()),
            recipient: Some(recipient),
            ..Self::default()
        }
    }

    /// Only collect messages from `chat`
    #[must_use]
    pub fn read(chat: ChatTarget) -> Self {
        Self {
            read_chat: Some(chat),
            ..Self::default()
        }
    }

    /// Set the chat to read from
    #[must_use]
    pub fn with_read_chat(mut self, chat: ChatTarget) -> Self {
        self.read_chat = Some(chat);
        self
    }

    /// Set the recipient without sending anything
    #[must_use]
    pub fn with_recipient(mut self, recipient: ChatTarget) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// Limit the number of collected messages
    #[must_use]
    pub const fn with_read_limit(mut self, limit: u32) -> Self {
        self.read_limit = Some(limit);
        self
    }

    /// Set the listen window
    #[must_use]
    pub const fn with_listen_seconds(mut self, seconds: f64) -> Self {
        self.listen_seconds = Some(seconds);
        self
    }

    /// Ask the engine to print QR codes
    #[must_use]
    pub const fn with_show_qr(mut self, show: bool) -> Self {
        self.show_qr = Some(show);
        self
    }

    /// Ask the engine to drop the stored session
    #[must_use]
    pub const fn with_force_relink(mut self, relink: bool) -> Self {
        self.force_relink = Some(relink);
        self
    }

    /// Chat the engine will read from: `read_chat`, else `recipient`
    pub fn effective_read_chat(&self) -> Option<&ChatTarget> {
        self.read_chat.as_ref().or(self.recipient.as_ref())
    }

    /// Copy of this command with `read_chat` filled from `recipient`
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut command = self.clone();
        if command.read_chat.is_none() {
            command.read_chat.clone_from(&command.recipient);
        }
        command
    }

    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.send_text.is_none()
            && self.recipient.is_none()
            && self.read_chat.is_none()
            && self.read_limit.is_none()
            && self.listen_seconds.is_none()
            && self.show_qr.is_none()
            && self.force_relink.is_none()
    }

    /// Names of the fields that are present, in wire order
    pub fn present_keys(&self) -> Vec<&'static str> {
        [
            ("send_text", self.send_text.is_some()),
            ("recipient", self.recipient.is_some()),
            ("read_chat", self.read_chat.is_some()),
            ("read_limit", self.read_limit.is_some()),
            ("listen_seconds", self.listen_seconds.is_some()),
            ("show_qr", self.show_qr.is_some()),
            ("force_relink", self.force_relink.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, present)| present.then_some(key))
        .collect()
    }

    /// Check that the command is internally consistent
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.send_text.is_some() && self.recipient.is_none() {
            return Err(DomainError::InvalidCommand(
                "send_text requires a recipient".to_string(),
            ));
        }

        if let Some(seconds) = self.listen_seconds {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(DomainError::InvalidCommand(format!(
                    "listen_seconds must be a non-negative number, got {seconds}"
                )));
            }
        }

        Ok(())
    }
}
