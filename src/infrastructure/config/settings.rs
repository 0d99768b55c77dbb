//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. Every
//! section is optional; an empty file yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use betslip::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::display::{DisplayConfig, StoreConfig};
use super::logging::LoggingConfig;
use super::ticker::TickerConfig;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub ticker: TickerConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "logging.level",
            }
            .into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected \"pretty\" or \"json\", got {:?}", self.logging.format),
            }
            .into());
        }

        let ticker = &self.ticker;
        if ticker.min_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ticker.min_interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if ticker.max_interval_ms < ticker.min_interval_ms {
            return Err(ConfigError::InvalidValue {
                field: "ticker.max_interval_ms",
                reason: "must be >= min_interval_ms".to_string(),
            }
            .into());
        }
        if ticker.max_lock_ms < ticker.min_lock_ms {
            return Err(ConfigError::InvalidValue {
                field: "ticker.max_lock_ms",
                reason: "must be >= min_lock_ms".to_string(),
            }
            .into());
        }

        if self.store.notification_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store.notification_capacity",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize tracing from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
