use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use distagram::{InMemoryUserRepository, SortKey, StorageError, UserRecord, UserRepository};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// In-memory store that counts writes
#[derive(Default)]
pub struct CountingUserRepository {
    inner: InMemoryUserRepository,
    upserts: AtomicUsize,
}

impl CountingUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for CountingUserRepository {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        self.inner.get(user_id).await
    }

    async fn upsert(&self, record: &UserRecord) -> Result<(), StorageError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(record).await
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StorageError> {
        self.inner.delete(user_id).await
    }

    async fn top_n(&self, n: usize, key: SortKey) -> Result<Vec<UserRecord>, StorageError> {
        self.inner.top_n(n, key).await
    }
}

/// In-memory store whose writes can be switched off
#[derive(Default)]
pub struct FailingUserRepository {
    inner: InMemoryUserRepository,
    fail_writes: AtomicBool,
}

impl FailingUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for FailingUserRepository {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        self.inner.get(user_id).await
    }

    async fn upsert(&self, record: &UserRecord) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.upsert(record).await
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.delete(user_id).await
    }

    async fn top_n(&self, n: usize, key: SortKey) -> Result<Vec<UserRecord>, StorageError> {
        self.inner.top_n(n, key).await
    }
}
