//! Bridge port - Interface to the external WhatsApp bridge engine
//!
//! An implementation is bound to one session store and one account; each
//! call hands the engine an optional command and waits for its result.

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use domain::{BridgeCommand, BridgeResult};

use crate::error::ApplicationError;

/// Port for a single request/response exchange with the bridge engine
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BridgePort: Send + Sync {
    /// Run one engine invocation
    ///
    /// `None` asks the engine for a status check. Implementations return
    /// `ApplicationError::Transport` when no response was produced and
    /// `ApplicationError::Protocol` when the response was malformed. A
    /// failure status is returned either as `ApplicationError::Bridge` or as
    /// a non-ok [`BridgeResult`], depending on how the adapter is configured.
    async fn invoke(
        &self,
        command: Option<BridgeCommand>,
    ) -> Result<BridgeResult, ApplicationError>;
}
