//! Profile storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Backend holding learner profiles
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Storage backend type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DATA_DIR"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/profiles")
}
