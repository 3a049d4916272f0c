//! Engine and gateway configuration

use integration_whatsapp::{EngineSymbols, GatewayOptions};
use serde::{Deserialize, Serialize};

use super::default_true;

pub(super) const DEFAULT_RUN_SYMBOL: &str = EngineSymbols::DEFAULT_RUN;
pub(super) const DEFAULT_FREE_SYMBOL: &str = EngineSymbols::DEFAULT_FREE;

/// Exported symbol names of the engine library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run entry point (default: `WaRun`)
    #[serde(default = "default_run_symbol")]
    pub run_symbol: String,

    /// Free entry point (default: `WaFree`)
    #[serde(default = "default_free_symbol")]
    pub free_symbol: String,
}

fn default_run_symbol() -> String {
    DEFAULT_RUN_SYMBOL.to_string()
}

fn default_free_symbol() -> String {
    DEFAULT_FREE_SYMBOL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            run_symbol: default_run_symbol(),
            free_symbol: default_free_symbol(),
        }
    }
}

impl EngineConfig {
    /// Symbol names for the native loader
    pub fn symbols(&self) -> EngineSymbols {
        EngineSymbols {
            run: self.run_symbol.clone(),
            free: self.free_symbol.clone(),
        }
    }
}

/// Gateway behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Raise on a non-ok status instead of returning it (default: true)
    ///
    /// Only changes what the gateway hands to its caller. `BridgeService`
    /// reports a non-ok status as a bridge error either way, so the
    /// `wa-bridge` exit code does not depend on it.
    #[serde(default = "default_true")]
    pub raise_on_error: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            raise_on_error: default_true(),
        }
    }
}

impl GatewayConfig {
    /// Options for the gateway
    pub const fn options(self) -> GatewayOptions {
        GatewayOptions {
            raise_on_error: self.raise_on_error,
        }
    }
}
