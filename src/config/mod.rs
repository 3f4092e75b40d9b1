//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `DEED_SCRIBE`
//! prefix and `__` (double underscore) separating nested keys.
//!
//! # Example
//!
//! ```no_run
//! use deed_scribe::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod extraction;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use extraction::ExtractionConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Extraction gateway retry policy.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Session storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present (development), then reads variables
    /// such as `DEED_SCRIBE__EXTRACTION__MAX_ATTEMPTS=5`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DEED_SCRIBE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.extraction.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_retry_policy_matches_extraction_defaults() {
        let config = AppConfig::default();
        let policy = config.extraction.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay.as_millis(), 1000);
    }
}
