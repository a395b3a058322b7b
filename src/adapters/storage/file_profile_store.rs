//! File-based Profile Store Adapter
//!
//! Stores each learner profile as a YAML file on disk. File names are the
//! SHA-256 hex digest of the user id, so any id maps to a safe path.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::UserId;
use crate::domain::learner::UserProfile;
use crate::ports::{ProfileStore, StoreError};

/// File-based storage for learner profiles
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    base_path: PathBuf,
}

impl FileProfileStore {
    /// Create a new file store with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let store = FileProfileStore::new("./data/profiles");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the profile file path for a user
    fn profile_path(&self, user_id: &UserId) -> PathBuf {
        let digest = Sha256::digest(user_id.as_str().as_bytes());
        self.base_path.join(format!("{:x}.yaml", digest))
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        let path = self.profile_path(user_id);

        let yaml = match fs::read_to_string(&path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::IoError(e.to_string())),
        };

        let profile = serde_yaml::from_str(&yaml)
            .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(profile))
    }

    async fn save(&self, user_id: &UserId, profile: &UserProfile) -> Result<(), StoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        let yaml = serde_yaml::to_string(profile)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

        // Write then rename so readers never observe a partial file.
        let path = self.profile_path(user_id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        tracing::debug!(user_id = %user_id, path = %path.display(), "Profile saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn load_missing_profile_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(temp_dir.path());

        assert!(store.load(&user("nobody")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_and_load_profile() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(temp_dir.path());
        let profile = UserProfile::seeded(user("learner-1"), 72.0);

        store.save(&user("learner-1"), &profile).await.unwrap();
        let loaded = store.load(&user("learner-1")).await.unwrap().unwrap();

        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn creates_missing_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(temp_dir.path().join("nested/profiles"));

        store
            .save(&user("a"), &UserProfile::new(user("a")))
            .await
            .unwrap();

        assert!(store.base_path().exists());
    }

    #[tokio::test]
    async fn unsafe_user_ids_map_to_hashed_file_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(temp_dir.path());
        let id = user("../../etc/passwd");

        store.save(&id, &UserProfile::new(id.clone())).await.unwrap();

        let path = store.profile_path(&id);
        assert_eq!(path.parent(), Some(temp_dir.path()));
        assert_eq!(path.file_stem().unwrap().len(), 64);
        assert!(store.load(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_deserialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(temp_dir.path());
        let id = user("broken");

        std::fs::write(store.profile_path(&id), "interaction_count: [not a number").unwrap();

        let result = store.load(&id).await;
        assert!(matches!(result, Err(StoreError::DeserializationFailed(_))));
    }

    #[tokio::test]
    async fn save_overwrites_previous_version() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileProfileStore::new(temp_dir.path());
        let id = user("learner-2");

        store.save(&id, &UserProfile::new(id.clone())).await.unwrap();
        store.save(&id, &UserProfile::seeded(id.clone(), 90.0)).await.unwrap();

        let loaded = store.load(&id).await.unwrap().unwrap();
        assert_eq!(loaded.capability_score(), 90.0);
    }
}
