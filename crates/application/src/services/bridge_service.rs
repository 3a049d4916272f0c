//! Bridge service
//!
//! Send, read and status use cases on top of [`BridgePort`]. Each use case
//! builds a [`BridgeCommand`], validates it, runs exactly one engine
//! invocation and turns the result into a [`BridgeOutcome`].

use std::sync::Arc;

use domain::{BridgeCommand, BridgeResult, ChatTarget};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::BridgePort};

/// Session parameters shared by all use cases
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOptions {
    /// Chat to read from instead of the recipient
    pub read_chat: Option<ChatTarget>,
    /// Maximum number of messages to collect (engine default when `None`)
    pub read_limit: Option<u32>,
    /// Listen window in seconds (engine default when `None`)
    pub listen_seconds: Option<f64>,
    /// Print QR codes when login is required
    pub show_qr: bool,
    /// Clear the stored session first
    pub force_relink: bool,
}

impl SessionOptions {
    /// Copy the options onto `command`
    ///
    /// Flags are only transmitted when set, so the engine never sees an
    /// explicit `false`.
    fn apply(&self, mut command: BridgeCommand) -> BridgeCommand {
        if let Some(chat) = &self.read_chat {
            command.read_chat = Some(chat.clone());
        }
        if let Some(limit) = self.read_limit {
            command.read_limit = Some(limit);
        }
        if let Some(seconds) = self.listen_seconds {
            command.listen_seconds = Some(seconds);
        }
        if self.show_qr {
            command.show_qr = Some(true);
        }
        if self.force_relink {
            command.force_relink = Some(true);
        }
        command
    }
}

/// What a successful engine call produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BridgeOutcome {
    /// Identifier of the sent message, if anything was sent
    pub message_id: Option<String>,
    /// Whether QR pairing was required during the call
    pub requires_qr: bool,
    /// Messages collected during the session
    pub last_messages: Vec<String>,
}

impl BridgeOutcome {
    /// Convert an engine result, surfacing a failure status as an error
    pub fn from_result(result: BridgeResult) -> Result<Self, ApplicationError> {
        if !result.is_ok() {
            return Err(ApplicationError::Bridge(result.error_message().to_string()));
        }

        Ok(Self {
            requires_qr: result.requires_qr(),
            message_id: result.message_id,
            last_messages: result.last_messages.unwrap_or_default(),
        })
    }
}

/// Use cases for talking to the bridge engine
#[derive(Clone)]
pub struct BridgeService {
    port: Arc<dyn BridgePort>,
}

impl std::fmt::Debug for BridgeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeService").finish_non_exhaustive()
    }
}

impl BridgeService {
    /// Create a new bridge service
    pub fn new(port: Arc<dyn BridgePort>) -> Self {
        Self { port }
    }

    /// Send `text` to `recipient` and collect the session's messages
    #[instrument(
        skip(self, text, options),
        fields(recipient = %recipient, jid = recipient.is_jid())
    )]
    pub async fn send_message(
        &self,
        recipient: ChatTarget,
        text: &str,
        options: &SessionOptions,
    ) -> Result<BridgeOutcome, ApplicationError> {
        let command = options.apply(BridgeCommand::send(recipient, text));
        let outcome = self.run(Some(command)).await?;

        info!(message_id = ?outcome.message_id, "Message handed to engine");
        Ok(outcome)
    }

    /// Listen for messages in `chat` without sending anything
    #[instrument(skip(self, options), fields(chat = %chat, jid = chat.is_jid()))]
    pub async fn read_messages(
        &self,
        chat: ChatTarget,
        options: &SessionOptions,
    ) -> Result<BridgeOutcome, ApplicationError> {
        let command = options.apply(BridgeCommand::read(chat));
        let outcome = self.run(Some(command)).await?;

        info!(count = outcome.last_messages.len(), "Messages collected");
        Ok(outcome)
    }

    /// Ask the engine for its login state
    ///
    /// Without QR or relink options no command is transmitted at all.
    #[instrument(skip(self, options))]
    pub async fn check_status(
        &self,
        options: &SessionOptions,
    ) -> Result<BridgeOutcome, ApplicationError> {
        let command = options.apply(BridgeCommand::default());
        let command = (!command.is_empty()).then_some(command);
        self.run(command).await
    }

    /// Run an arbitrary command through the port
    pub async fn run(
        &self,
        command: Option<BridgeCommand>,
    ) -> Result<BridgeOutcome, ApplicationError> {
        if let Some(command) = &command {
            command.validate()?;
            debug!(keys = ?command.present_keys(), "Invoking bridge engine");
        } else {
            debug!("Invoking bridge engine without command");
        }

        let result = self.port.invoke(command).await?;
        BridgeOutcome::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockBridgePort;

    fn target(s: &str) -> ChatTarget {
        ChatTarget::new(s).unwrap()
    }

    fn service(mock: MockBridgePort) -> BridgeService {
        BridgeService::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn send_message_builds_send_command() {
        let mut mock = MockBridgePort::new();
        mock.expect_invoke()
            .withf(|command| {
                command.as_ref().is_some_and(|c| {
                    c.send_text.as_deref() == Some("hi")
                        && c.recipient.as_ref().map(ChatTarget::as_str) == Some("123")
                        && c.read_chat.as_ref().map(ChatTarget::as_str) == Some("123")
                        && c.show_qr.is_none()
                        && c.force_relink.is_none()
                })
            })
            .times(1)
            .returning(|_| {
                Ok(BridgeResult {
                    message_id: Some("3EB0ABC".to_string()),
                    ..BridgeResult::ok()
                })
            });

        let outcome = service(mock)
            .send_message(target("123"), "hi", &SessionOptions::default())
            .await
            .unwrap();

        assert_eq!(outcome.message_id.as_deref(), Some("3EB0ABC"));
        assert!(!outcome.requires_qr);
    }

    #[tokio::test]
    async fn send_message_respects_read_chat_override() {
        let mut mock = MockBridgePort::new();
        mock.expect_invoke()
            .withf(|command| {
                command
                    .as_ref()
                    .and_then(|c| c.read_chat.as_ref())
                    .map(ChatTarget::as_str)
                    == Some("120363025246125486@g.us")
            })
            .returning(|_| Ok(BridgeResult::ok()));

        let options = SessionOptions {
            read_chat: Some(target("120363025246125486@g.us")),
            ..SessionOptions::default()
        };
        service(mock)
            .send_message(target("123"), "hi", &options)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn read_messages_only_sets_read_fields() {
        let mut mock = MockBridgePort::new();
        mock.expect_invoke()
            .withf(|command| {
                command.as_ref().is_some_and(|c| {
                    c.send_text.is_none()
                        && c.recipient.is_none()
                        && c.read_chat.as_ref().map(ChatTarget::as_str) == Some("456")
                        && c.read_limit == Some(10)
                        && c.listen_seconds == Some(3.0)
                })
            })
            .returning(|_| {
                Ok(BridgeResult {
                    last_messages: Some(vec!["a".to_string(), "b".to_string()]),
                    ..BridgeResult::ok()
                })
            });

        let options = SessionOptions {
            read_limit: Some(10),
            listen_seconds: Some(3.0),
            ..SessionOptions::default()
        };
        let outcome = service(mock)
            .read_messages(target("456"), &options)
            .await
            .unwrap();

        assert_eq!(outcome.last_messages, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn check_status_sends_no_command_by_default() {
        let mut mock = MockBridgePort::new();
        mock.expect_invoke()
            .withf(|command| command.is_none())
            .times(1)
            .returning(|_| {
                Ok(BridgeResult {
                    requires_qr: Some(true),
                    ..BridgeResult::ok()
                })
            });

        let outcome = service(mock)
            .check_status(&SessionOptions::default())
            .await
            .unwrap();
        assert!(outcome.requires_qr);
    }

    #[tokio::test]
    async fn check_status_with_relink_sends_flags() {
        let mut mock = MockBridgePort::new();
        mock.expect_invoke()
            .withf(|command| {
                command.as_ref().is_some_and(|c| {
                    c.force_relink == Some(true) && c.show_qr == Some(true) && c.read_chat.is_none()
                })
            })
            .returning(|_| Ok(BridgeResult::ok()));

        let options = SessionOptions {
            show_qr: true,
            force_relink: true,
            ..SessionOptions::default()
        };
        service(mock).check_status(&options).await.unwrap();
    }

    #[tokio::test]
    async fn failure_status_becomes_bridge_error() {
        let mut mock = MockBridgePort::new();
        mock.expect_invoke()
            .returning(|_| Ok(BridgeResult::failed("not logged in")));

        let err = service(mock)
            .check_status(&SessionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Bridge(ref m) if m == "not logged in"));
    }

    #[tokio::test]
    async fn port_errors_propagate_unchanged() {
        let mut mock = MockBridgePort::new();
        mock.expect_invoke().returning(|_| {
            Err(ApplicationError::Transport(
                "library returned NULL pointer".to_string(),
            ))
        });

        let err = service(mock)
            .read_messages(target("123"), &SessionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Transport(_)));
    }

    #[tokio::test]
    async fn invalid_command_never_reaches_port() {
        let mut mock = MockBridgePort::new();
        mock.expect_invoke().never();

        let options = SessionOptions {
            listen_seconds: Some(-5.0),
            ..SessionOptions::default()
        };
        let err = service(mock)
            .read_messages(target("123"), &options)
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Domain(_)));
    }

    #[tokio::test]
    async fn run_rejects_send_without_recipient() {
        let mut mock = MockBridgePort::new();
        mock.expect_invoke().never();

        let command = BridgeCommand {
            send_text: Some("hi".to_string()),
            ..BridgeCommand::default()
        };
        let err = service(mock).run(Some(command)).await.unwrap_err();
        assert_eq!(err.category(), "Invalid request");
    }

    #[test]
    fn outcome_from_ok_result() {
        let result = BridgeResult {
            message_id: Some("ID1".to_string()),
            requires_qr: Some(true),
            last_messages: Some(vec!["m".to_string()]),
            ..BridgeResult::ok()
        };
        let outcome = BridgeOutcome::from_result(result).unwrap();
        assert_eq!(
            outcome,
            BridgeOutcome {
                message_id: Some("ID1".to_string()),
                requires_qr: true,
                last_messages: vec!["m".to_string()],
            }
        );
    }

    #[test]
    fn outcome_from_failed_result_without_message() {
        let result: BridgeResult = serde_json::from_str(r#"{"status":"denied"}"#).unwrap();
        let err = BridgeOutcome::from_result(result).unwrap_err();
        assert_eq!(err.to_string(), "Bridge error: unknown bridge error");
    }

    #[test]
    fn options_do_not_transmit_false_flags() {
        let command = SessionOptions::default().apply(BridgeCommand::read(target("1")));
        assert!(command.show_qr.is_none());
        assert!(command.force_relink.is_none());
    }

    #[test]
    fn debug_does_not_expose_port() {
        let service = service(MockBridgePort::new());
        assert!(format!("{service:?}").contains("BridgeService"));
    }
}
