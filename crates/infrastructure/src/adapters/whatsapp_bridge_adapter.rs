//! WhatsApp bridge adapter
//!
//! Implements the `BridgePort` trait using the WhatsApp engine gateway.

use std::fmt;

use application::error::ApplicationError;
use application::ports::BridgePort;
use async_trait::async_trait;
use domain::{AccountId, BridgeCommand, BridgeResult, ConnectionUri};
use integration_whatsapp::{AsyncBridgeGateway, BridgeGateway, EngineAbi, GatewayError};
use tracing::{debug, instrument, warn};

/// Adapter that implements `BridgePort` for one session store and account
pub struct WhatsAppBridgeAdapter<E> {
    gateway: AsyncBridgeGateway<E>,
    db_uri: ConnectionUri,
    account: AccountId,
}

impl<E: EngineAbi + 'static> WhatsAppBridgeAdapter<E> {
    /// Create a new adapter
    pub fn new(gateway: BridgeGateway<E>, db_uri: ConnectionUri, account: AccountId) -> Self {
        Self {
            gateway: AsyncBridgeGateway::new(gateway),
            db_uri,
            account,
        }
    }

    /// Get a reference to the underlying gateway
    pub fn gateway(&self) -> &BridgeGateway<E> {
        self.gateway.gateway()
    }

    /// Account this adapter acts as
    pub const fn account(&self) -> &AccountId {
        &self.account
    }
}

impl<E: fmt::Debug> fmt::Debug for WhatsAppBridgeAdapter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhatsAppBridgeAdapter")
            .field("gateway", &self.gateway)
            .field("db_uri", &self.db_uri)
            .field("account", &self.account)
            .finish()
    }
}

#[async_trait]
impl<E: EngineAbi + 'static> BridgePort for WhatsAppBridgeAdapter<E> {
    #[instrument(skip(self, command), fields(account = %self.account))]
    async fn invoke(
        &self,
        command: Option<BridgeCommand>,
    ) -> Result<BridgeResult, ApplicationError> {
        let result = self
            .gateway
            .invoke(self.db_uri.clone(), self.account.clone(), command)
            .await
            .map_err(|err| {
                warn!(
                    error = %err,
                    engine_responded = err.engine_responded(),
                    "Bridge call failed"
                );
                map_gateway_error(err)
            })?;

        debug!(status = %result.status, "Bridge call returned");
        Ok(result)
    }
}

/// Map gateway errors onto the application taxonomy
fn map_gateway_error(err: GatewayError) -> ApplicationError {
    match err {
        GatewayError::Transport(msg) => ApplicationError::Transport(msg),
        GatewayError::Protocol(msg) => ApplicationError::Protocol(msg),
        GatewayError::Bridge(msg) => ApplicationError::Bridge(msg),
        GatewayError::InvalidRequest(msg) => ApplicationError::InvalidRequest(msg),
        GatewayError::Library(msg) => ApplicationError::Configuration(msg),
    }
}

#[cfg(test)]
mod tests {
    use domain::ChatTarget;
    use integration_whatsapp::GatewayOptions;
    use integration_whatsapp::testing::TrackingEngine;

    use super::*;

    fn adapter(engine: TrackingEngine) -> WhatsAppBridgeAdapter<TrackingEngine> {
        WhatsAppBridgeAdapter::new(
            BridgeGateway::new(engine),
            ConnectionUri::new("file:test.db").unwrap(),
            AccountId::new("491234567890").unwrap(),
        )
    }

    #[tokio::test]
    async fn invoke_passes_session_to_engine() {
        let adapter = adapter(TrackingEngine::responding(
            r#"{"status":"ok","message_id":"3EB0"}"#,
        ));
        let command = BridgeCommand::send(ChatTarget::new("123").unwrap(), "hi");

        let result = adapter.invoke(Some(command)).await.unwrap();

        assert_eq!(result.message_id.as_deref(), Some("3EB0"));
        let calls = adapter.gateway().engine().calls();
        assert_eq!(calls[0].db_uri, "file:test.db");
        assert_eq!(calls[0].account, "491234567890");
    }

    #[tokio::test]
    async fn transport_error_is_preserved() {
        let adapter = adapter(TrackingEngine::returning_null());
        let err = adapter.invoke(None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Transport(_)));
    }

    #[tokio::test]
    async fn protocol_error_is_preserved() {
        let adapter = adapter(TrackingEngine::responding("nope"));
        let err = adapter.invoke(None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Protocol(_)));
    }

    #[tokio::test]
    async fn bridge_error_is_preserved() {
        let adapter = adapter(TrackingEngine::responding(
            r#"{"status":"error","error":"not logged in"}"#,
        ));
        let err = adapter.invoke(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Bridge error: not logged in");
    }

    #[tokio::test]
    async fn failure_is_returned_when_not_raising() {
        let adapter = WhatsAppBridgeAdapter::new(
            BridgeGateway::with_options(
                TrackingEngine::responding(r#"{"status":"error"}"#),
                GatewayOptions {
                    raise_on_error: false,
                },
            ),
            ConnectionUri::default(),
            AccountId::new("491234567890").unwrap(),
        );

        let result = adapter.invoke(None).await.unwrap();
        assert!(!result.is_ok());
    }

    #[test]
    fn every_gateway_error_keeps_its_category() {
        let cases = [
            (GatewayError::transport("x"), "Transport error"),
            (GatewayError::protocol("x"), "Protocol error"),
            (GatewayError::bridge("x"), "Bridge error"),
            (GatewayError::invalid_request("x"), "Invalid request"),
            (GatewayError::library("x"), "Configuration error"),
        ];
        for (err, category) in cases {
            assert_eq!(map_gateway_error(err).category(), category);
        }
    }
}
