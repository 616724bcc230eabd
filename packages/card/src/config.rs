//! Card composition settings.
//!
//! Defaults are embedded from `config/card.toml`. A deployment can point
//! `STREET_CARD_CONFIG` at its own TOML file; any section it omits keeps
//! the default.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::nearby::DEFAULT_POI_LIMIT;
use crate::radius::{DEFAULT_POI_RADIUS_M, RadiusPolicy};

/// Environment variable naming an override config file.
pub const CONFIG_PATH_ENV: &str = "STREET_CARD_CONFIG";

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/card.toml");

const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;

/// Errors from loading or validating a [`CardConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`CardConfig`].
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of the offending value.
        message: String,
    },
}

/// Fixed-radius POI search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PoiPolicy {
    /// Search radius in meters, independent of fix accuracy.
    pub radius_m: u32,
    /// Maximum number of POIs on a card.
    pub limit: u32,
}

impl Default for PoiPolicy {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_POI_RADIUS_M,
            limit: DEFAULT_POI_LIMIT,
        }
    }
}

/// Settings for the card composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CardConfig {
    /// Bounds for the accuracy-derived street snap radius.
    #[serde(default)]
    pub snap: RadiusPolicy,
    /// Nearby POI search settings.
    #[serde(default)]
    pub poi: PoiPolicy,
    /// Deadline for composing one card, in milliseconds.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

const fn default_query_timeout_ms() -> u64 {
    DEFAULT_QUERY_TIMEOUT_MS
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            snap: RadiusPolicy::default(),
            poi: PoiPolicy::default(),
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
        }
    }
}

impl CardConfig {
    /// Parses and validates a config from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or a value is out
    /// of range.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the embedded default config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_CONFIG_TOML)
    }

    /// Loads the config from `path`, or the embedded default when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                log::info!("Loading card config from {}", path.display());
                Self::from_toml_str(&std::fs::read_to_string(path)?)
            }
            None => Self::embedded(),
        }
    }

    /// Loads the config named by `STREET_CARD_CONFIG`, falling back to the
    /// embedded default when the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the named file cannot be read or is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV);
        Self::load(path.as_deref().map(Path::new))
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.snap.validate()?;
        if self.poi.radius_m == 0 {
            return Err(ConfigError::Invalid {
                message: "poi.radius_m must be positive".to_string(),
            });
        }
        if self.poi.limit == 0 {
            return Err(ConfigError::Invalid {
                message: "poi.limit must be positive".to_string(),
            });
        }
        if self.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "query_timeout_ms must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the composition deadline.
    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}
