//! Per-user serialization of pipeline runs.
//!
//! One async mutex per user id, created on first use and dropped again
//! once nobody holds or waits on it. Different users never contend.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::UserId;

/// Registry of per-user locks.
#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    locks: Arc<DashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other run for `user_id` is in flight.
    pub async fn acquire(&self, user_id: &UserId) -> UserLockGuard {
        let mutex = self
            .locks
            .entry(user_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = mutex.lock_owned().await;

        UserLockGuard {
            guard: Some(guard),
            user_id: user_id.clone(),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of users with a live lock entry.
    pub fn active_users(&self) -> usize {
        self.locks.len()
    }
}

/// Held for the duration of one run; releases and prunes on drop.
#[derive(Debug)]
pub struct UserLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    user_id: UserId,
    locks: Arc<DashMap<UserId, Arc<Mutex<()>>>>,
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the registry's own reference left: nobody is waiting.
        self.locks
            .remove_if(&self.user_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
