//! Async front for the blocking gateway
//!
//! Engine calls can block for the whole listen window, so they are moved to
//! tokio's blocking pool instead of running on a runtime worker.

use std::fmt;
use std::sync::Arc;

use domain::{AccountId, BridgeCommand, BridgeResult, ConnectionUri};
use tracing::{debug, error};

use crate::engine::EngineAbi;
use crate::error::GatewayError;
use crate::gateway::BridgeGateway;

/// Runs [`BridgeGateway::invoke`] on `spawn_blocking`
///
/// Dropping the returned future does not cancel the engine call; the
/// blocking task still finishes and releases the response buffer.
pub struct AsyncBridgeGateway<E> {
    inner: Arc<BridgeGateway<E>>,
}

impl<E> Clone for AsyncBridgeGateway<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: EngineAbi + 'static> AsyncBridgeGateway<E> {
    /// Wrap a gateway
    #[must_use]
    pub fn new(gateway: BridgeGateway<E>) -> Self {
        Self {
            inner: Arc::new(gateway),
        }
    }

    /// The wrapped blocking gateway
    #[must_use]
    pub fn gateway(&self) -> &BridgeGateway<E> {
        &self.inner
    }

    /// Invoke the engine without blocking the async runtime
    pub async fn invoke(
        &self,
        db_uri: ConnectionUri,
        account: AccountId,
        command: Option<BridgeCommand>,
    ) -> Result<BridgeResult, GatewayError> {
        let gateway = Arc::clone(&self.inner);
        debug!(account = %account, "Dispatching engine call to blocking pool");

        tokio::task::spawn_blocking(move || gateway.invoke(&db_uri, &account, command.as_ref()))
            .await
            .map_err(|e| {
                error!(error = %e, "Engine call did not complete");
                GatewayError::transport(format!("engine call did not complete: {e}"))
            })?
    }
}

impl<E: fmt::Debug> fmt::Debug for AsyncBridgeGateway<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncBridgeGateway")
            .field("gateway", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TrackingEngine;

    fn account() -> AccountId {
        AccountId::new("491234567890").unwrap()
    }

    #[tokio::test]
    async fn invoke_returns_engine_result() {
        let gateway = AsyncBridgeGateway::new(BridgeGateway::new(TrackingEngine::responding(
            r#"{"status":"ok","requires_qr":true}"#,
        )));

        let result = gateway
            .invoke(ConnectionUri::default(), account(), None)
            .await
            .unwrap();

        assert!(result.requires_qr());
        assert_eq!(gateway.gateway().engine().outstanding(), 0);
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let gateway =
            AsyncBridgeGateway::new(BridgeGateway::new(TrackingEngine::returning_null()));

        let err = gateway
            .invoke(ConnectionUri::default(), account(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn panicking_engine_maps_to_transport_error() {
        let engine = TrackingEngine::with_responder(|_| panic!("engine crashed"));
        let gateway = AsyncBridgeGateway::new(BridgeGateway::new(engine));

        let err = gateway
            .invoke(ConnectionUri::default(), account(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Transport(ref m) if m.contains("did not complete")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_calls_release_every_buffer() {
        let gateway = AsyncBridgeGateway::new(BridgeGateway::new(TrackingEngine::responding(
            r#"{"status":"ok"}"#,
        )));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gateway = gateway.clone();
                tokio::spawn(async move {
                    gateway
                        .invoke(ConnectionUri::default(), account(), None)
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let engine = gateway.gateway().engine();
        assert_eq!(engine.allocation_count(), 16);
        assert_eq!(engine.release_count(), 16);
        assert_eq!(engine.outstanding(), 0);
    }
}
