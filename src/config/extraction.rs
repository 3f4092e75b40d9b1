//! Extraction gateway configuration

use serde::Deserialize;
use std::time::Duration;

use crate::application::handlers::interview::RetryPolicy;

use super::error::ValidationError;

/// Retry policy for the extraction gateway call.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Total attempts per upload, the first call included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Growth factor applied per subsequent attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl ExtractionConfig {
    /// The retry policy the process-step handler runs with.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            multiplier: self.backoff_multiplier,
        }
    }

    /// Validate extraction configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_attempts == 0 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        if self.backoff_multiplier < 1.0 {
            return Err(ValidationError::InvalidBackoffMultiplier);
        }
        if self.base_delay_ms > 60_000 {
            return Err(ValidationError::BaseDelayTooLarge);
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}
