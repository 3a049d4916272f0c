//! Request encoding and response decoding

use std::ffi::CString;

use domain::{BridgeCommand, BridgeResult};

use crate::error::GatewayError;

/// Encode a command as the engine's payload string
///
/// An absent or empty command becomes an empty string. Otherwise the
/// command is validated, `read_chat` is filled from `recipient`, and the
/// result is serialized as compact JSON.
pub fn encode_command(command: Option<&BridgeCommand>) -> Result<CString, GatewayError> {
    let Some(command) = command.filter(|c| !c.is_empty()) else {
        return Ok(CString::default());
    };

    command
        .validate()
        .map_err(|e| GatewayError::invalid_request(e.to_string()))?;

    let json = serde_json::to_string(&command.normalized())
        .map_err(|e| GatewayError::invalid_request(format!("failed to encode command: {e}")))?;

    CString::new(json).map_err(|_| GatewayError::invalid_request("command contains a NUL byte"))
}

/// Decode an engine response
pub fn decode_result(bytes: &[u8]) -> Result<BridgeResult, GatewayError> {
    if bytes.is_empty() {
        return Err(GatewayError::protocol("engine returned an empty response"));
    }

    serde_json::from_slice(bytes)
        .map_err(|e| GatewayError::protocol(format!("malformed engine response: {e}")))
}
