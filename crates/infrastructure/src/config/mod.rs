//! Application configuration
//!
//! Split into focused sub-modules:
//! - `engine`: engine symbols and gateway behaviour
//! - `logging`: log output format and level
//!
//! Sources are layered, later ones winning: built-in defaults, an optional
//! TOML file, then `WA_BRIDGE_*` environment variables. Command-line flags
//! are applied on top by the binary.

mod engine;
mod logging;

use std::path::{Path, PathBuf};

use application::ApplicationError;
use domain::{AccountId, ConnectionUri};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use engine::{EngineConfig, GatewayConfig};
pub use logging::{LogFormat, LoggingConfig};

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Engine library used when nothing else is configured
pub const DEFAULT_LIBRARY_PATH: &str = "dist/libwa.so";

/// Config file looked up in the working directory (any supported extension)
pub const DEFAULT_CONFIG_FILE: &str = "wa-bridge";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "WA_BRIDGE";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the engine shared library
    #[serde(default = "default_library_path")]
    pub library_path: PathBuf,

    /// Connection string for the engine's session store
    #[serde(default = "default_db_uri")]
    pub db_uri: String,

    /// Phone number of the account to act as
    #[serde(default)]
    pub account_phone: Option<String>,

    /// Engine symbol names
    #[serde(default)]
    pub engine: EngineConfig,

    /// Gateway behaviour
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_library_path() -> PathBuf {
    PathBuf::from(DEFAULT_LIBRARY_PATH)
}

fn default_db_uri() -> String {
    ConnectionUri::DEFAULT.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library_path: default_library_path(),
            db_uri: default_db_uri(),
            account_phone: None,
            engine: EngineConfig::default(),
            gateway: GatewayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// With `path` set the file must exist; otherwise `wa-bridge.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, Self::environment())
    }

    /// Environment source for `WA_BRIDGE_*` variables
    ///
    /// Nested keys use a double underscore, e.g. `WA_BRIDGE_ENGINE__RUN_SYMBOL`.
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("library_path", DEFAULT_LIBRARY_PATH)?
            .set_default("db_uri", ConnectionUri::DEFAULT)?
            .set_default("engine.run_symbol", engine::DEFAULT_RUN_SYMBOL)?
            .set_default("engine.free_symbol", engine::DEFAULT_FREE_SYMBOL)?
            .set_default("gateway.raise_on_error", true)?;

        let builder = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading config file");
                builder.add_source(config::File::from(path).required(true))
            },
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        builder.add_source(env).build()?.try_deserialize()
    }

    /// Validated connection URI
    pub fn connection_uri(&self) -> Result<ConnectionUri, ApplicationError> {
        Ok(ConnectionUri::new(self.db_uri.as_str())?)
    }

    /// Validated account id
    ///
    /// Fails with a configuration error when no phone number is set.
    pub fn account_id(&self) -> Result<AccountId, ApplicationError> {
        let phone = self
            .account_phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                ApplicationError::Configuration(format!(
                    "account phone is not set (use --account-phone or {ENV_PREFIX}_ACCOUNT_PHONE)"
                ))
            })?;
        Ok(AccountId::new(phone)?)
    }
}
