use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock};

/// Per-user mutual exclusion for record read-modify-write cycles.
///
/// One registry is shared by every component that mutates records so that an
/// action and a balance adjustment for the same user cannot interleave.
/// Different users never contend.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: RwLock<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `user_id`. Released when the guard drops.
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        self.lock_for(user_id).await.lock_owned().await
    }

    async fn lock_for(&self, user_id: &str) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.locks.read().await;
            if let Some(lock) = guard.get(user_id) {
                return lock.clone();
            }
        }

        let mut guard = self.locks.write().await;
        guard
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Drops the lock entry of an unregistered user unless anyone besides
    /// the caller is holding or waiting on it. May be called with the
    /// caller's own guard still alive.
    pub async fn forget(&self, user_id: &str) {
        let mut guard = self.locks.write().await;
        if let Some(lock) = guard.get(user_id) {
            // the map's reference plus, at most, the caller's guard
            if Arc::strong_count(lock) <= 2 {
                guard.remove(user_id);
            }
        }
    }

    pub async fn tracked(&self) -> usize {
        self.locks.read().await.len()
    }
}
