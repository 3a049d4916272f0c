//! Synchronous bridge gateway
//!
//! One call in, one result out. The calling thread blocks for as long as the
//! engine takes, which includes QR pairing and the listen window.

use std::ffi::CString;
use std::fmt;
use std::time::Instant;

use domain::{AccountId, BridgeCommand, BridgeResult, ConnectionUri};
use tracing::{debug, instrument, warn};

use crate::codec::{decode_result, encode_command};
use crate::engine::{EngineAbi, EngineBuffer};
use crate::error::GatewayError;

/// Behaviour switches for [`BridgeGateway`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayOptions {
    /// Turn a non-ok status into [`GatewayError::Bridge`]
    ///
    /// When disabled, failure results are returned as values.
    pub raise_on_error: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            raise_on_error: true,
        }
    }
}

/// Gateway to a bridge engine
pub struct BridgeGateway<E> {
    engine: E,
    options: GatewayOptions,
}

impl<E: EngineAbi> BridgeGateway<E> {
    /// Create a gateway that raises on failure status
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, GatewayOptions::default())
    }

    /// Create a gateway with explicit options
    #[must_use]
    pub const fn with_options(engine: E, options: GatewayOptions) -> Self {
        Self { engine, options }
    }

    /// The underlying engine
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Active options
    #[must_use]
    pub const fn options(&self) -> GatewayOptions {
        self.options
    }

    /// Send an optional command to the engine and decode its result
    #[instrument(skip(self, db_uri, command), fields(account = %account))]
    pub fn invoke(
        &self,
        db_uri: &ConnectionUri,
        account: &AccountId,
        command: Option<&BridgeCommand>,
    ) -> Result<BridgeResult, GatewayError> {
        let payload = encode_command(command)?;
        if let Some(command) = command {
            debug!(keys = ?command.present_keys(), "Encoded bridge command");
        }
        self.call(db_uri, account, &payload)
    }

    /// Send an already-encoded payload verbatim
    ///
    /// For engines that take a bare message text instead of a JSON command.
    #[instrument(skip(self, db_uri, payload), fields(account = %account, payload_len = payload.len()))]
    pub fn invoke_raw(
        &self,
        db_uri: &ConnectionUri,
        account: &AccountId,
        payload: &str,
    ) -> Result<BridgeResult, GatewayError> {
        let payload = CString::new(payload)
            .map_err(|_| GatewayError::invalid_request("payload contains a NUL byte"))?;
        self.call(db_uri, account, &payload)
    }

    fn call(
        &self,
        db_uri: &ConnectionUri,
        account: &AccountId,
        payload: &CString,
    ) -> Result<BridgeResult, GatewayError> {
        let db_uri = c_string("connection URI", db_uri.as_str())?;
        let account = c_string("account", account.as_str())?;

        let started = Instant::now();
        let Some(buffer) = EngineBuffer::invoke(&self.engine, &db_uri, &account, payload) else {
            warn!(elapsed = ?started.elapsed(), "Engine returned no response");
            return Err(GatewayError::transport("library returned NULL pointer"));
        };

        let decoded = decode_result(buffer.bytes());
        drop(buffer);

        let result = decoded?;
        debug!(
            status = %result.status,
            requires_qr = result.requires_qr(),
            messages = result.last_messages().len(),
            elapsed = ?started.elapsed(),
            "Engine call completed"
        );

        if self.options.raise_on_error && !result.is_ok() {
            warn!(status = %result.status, "Engine reported failure");
            return Err(GatewayError::bridge(result.error_message()));
        }

        Ok(result)
    }
}

fn c_string(what: &str, value: &str) -> Result<CString, GatewayError> {
    CString::new(value)
        .map_err(|_| GatewayError::invalid_request(format!("{what} contains a NUL byte")))
}

impl<E: fmt::Debug> fmt::Debug for BridgeGateway<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeGateway")
            .field("engine", &self.engine)
            .field("options", &self.options)
            .finish()
    }
}
