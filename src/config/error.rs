//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Extraction max_attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("Extraction backoff multiplier must be at least 1.0")]
    InvalidBackoffMultiplier,

    #[error("Extraction base delay exceeds maximum allowed (60s)")]
    BaseDelayTooLarge,

    #[error("Storage data_dir cannot be empty when set")]
    EmptyDataDir,
}
