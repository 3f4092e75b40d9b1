//! Session storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where sessions are persisted.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory for the JSON-file session store. When unset, callers are
    /// expected to wire the in-memory store.
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(ValidationError::EmptyDataDir);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_data_dir_is_valid() {
        assert!(StorageConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_data_dir_is_rejected() {
        let config = StorageConfig {
            data_dir: Some(PathBuf::new()),
        };
        assert!(matches!(config.validate(), Err(ValidationError::EmptyDataDir)));
    }
}
