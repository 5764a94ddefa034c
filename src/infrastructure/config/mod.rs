//! # Configuration
//!
//! Layered settings: an optional TOML file, overridden by environment
//! variables prefixed `MARKET_PROTOCOL_` with `__` between nested keys.
//!
//! ```text
//! MARKET_PROTOCOL_PROTOCOL__LOCK_VALIDITY_WINDOW=20
//! MARKET_PROTOCOL_LOGGING__FORMAT=json
//! ```
//!
//! A `.env` file in the working directory is loaded first if present.

pub mod logging;

use crate::domain::value_objects::ProtocolConstants;
use ::config::{Config, Environment, File, FileFormat, Source};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use logging::{LogFormat, LoggingConfig};

/// File read when no explicit path is given (extension resolved by `config`).
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Prefix of overriding environment variables.
pub const ENV_PREFIX: &str = "MARKET_PROTOCOL";

/// Errors raised while loading settings or installing logging.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// Loaded values violate an invariant.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Protocol-wide constants shared by every market.
    pub protocol: ProtocolConstants,
    /// Logging setup.
    pub logging: LoggingConfig,
}

impl Settings {
    /// Loads settings from `path` (or [`DEFAULT_CONFIG_FILE`] if present)
    /// and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if an explicit file is missing or any
    /// source is malformed, `ConfigError::Invalid` if the constants are out
    /// of range.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();
        let environment = Self::environment();
        match path {
            Some(path) => Self::from_sources(File::from(path).required(true), environment),
            None => Self::from_sources(
                File::with_name(DEFAULT_CONFIG_FILE).required(false),
                environment,
            ),
        }
    }

    /// Parses settings from TOML text, without consulting the environment.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn from_toml_str(toml: &str) -> ConfigResult<Self> {
        let nothing = Environment::with_prefix(ENV_PREFIX).source(Some(Default::default()));
        Self::from_sources(File::from_str(toml, FileFormat::Toml), nothing)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn from_sources<S>(file: S, environment: Environment) -> ConfigResult<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings: Self = Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the loaded constants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first violation.
    pub fn validate(&self) -> ConfigResult<()> {
        self.protocol
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}
