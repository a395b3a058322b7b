//! In-Memory Profile Store Adapter
//!
//! Keeps profiles in a map for the lifetime of the process.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::learner::UserProfile;
use crate::ports::{ProfileStore, StoreError};

/// In-memory storage for learner profiles
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
    fail_loads: Arc<AtomicBool>,
    fail_saves: Arc<AtomicBool>,
}

impl InMemoryProfileStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent loads fail with `StoreError::Unavailable`
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent saves fail with `StoreError::Unavailable`
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Insert a profile directly, bypassing failure injection
    pub async fn insert(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id().clone(), profile);
    }

    /// Get the number of stored profiles
    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// Clear all stored data
    pub async fn clear(&self) {
        self.profiles.write().await.clear();
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store set to fail loads".into()));
        }
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn save(&self, user_id: &UserId, profile: &UserProfile) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store set to fail saves".into()));
        }
        self.profiles
            .write()
            .await
            .insert(user_id.clone(), profile.clone());
        Ok(())
    }
}
