//! ProfileStore port for learner profile persistence

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::learner::UserProfile;

/// Errors that can occur during profile storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to serialize profile: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize profile: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::new(ErrorCode::StorageError, err.to_string())
    }
}

/// Loads and saves learner profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load a profile
    ///
    /// # Returns
    /// `None` when no profile exists for the user
    ///
    /// # Errors
    /// Returns `StoreError` if the backing store cannot be read
    async fn load(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Save a profile, replacing any previous version
    ///
    /// # Errors
    /// Returns `StoreError` if the profile cannot be written
    async fn save(&self, user_id: &UserId, profile: &UserProfile) -> Result<(), StoreError>;
}
