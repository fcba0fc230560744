use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    errors::StorageError,
    models::{SortKey, UserRecord},
};

/// Trait for user record repository operations
///
/// Every write is a whole-row replacement. Callers that read-modify-write
/// must hold the user's lock from [`super::UserLocks`] for the whole cycle.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError>;
    async fn upsert(&self, record: &UserRecord) -> Result<(), StorageError>;
    /// Returns whether a record was removed
    async fn delete(&self, user_id: &str) -> Result<bool, StorageError>;
    /// Highest `key` first; ties keep registration order (earliest first)
    async fn top_n(&self, n: usize, key: SortKey) -> Result<Vec<UserRecord>, StorageError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    next_seq: u64,
    users: HashMap<String, (u64, UserRecord)>,
}

/// In-memory implementation of UserRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: RwLock<MemoryState>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory repository with pre-populated records, registered
    /// in the order given
    pub fn with_records(records: Vec<UserRecord>) -> Self {
        let mut state = MemoryState::default();
        for record in records {
            let seq = state.next_seq;
            state.next_seq += 1;
            state.users.insert(record.user_id.clone(), (seq, record));
        }

        Self {
            state: RwLock::new(state),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let state = self.state.read().await;
        let record = state.users.get(user_id).map(|(_, record)| record.clone());
        debug!(user_id, found = record.is_some(), "Fetched user from memory");
        Ok(record)
    }

    #[instrument(skip(self, record), fields(user_id = %record.user_id))]
    async fn upsert(&self, record: &UserRecord) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        let seq = match state.users.get(&record.user_id) {
            Some((seq, _)) => *seq,
            None => {
                let seq = state.next_seq;
                state.next_seq += 1;
                seq
            }
        };
        state
            .users
            .insert(record.user_id.clone(), (seq, record.clone()));

        debug!("User upserted in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: &str) -> Result<bool, StorageError> {
        let mut state = self.state.write().await;
        let removed = state.users.remove(user_id).is_some();
        debug!(user_id, removed, "User deleted from memory");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn top_n(&self, n: usize, key: SortKey) -> Result<Vec<UserRecord>, StorageError> {
        let state = self.state.read().await;
        let mut ranked: Vec<&(u64, UserRecord)> = state.users.values().collect();
        ranked.sort_by(|(seq_a, a), (seq_b, b)| {
            b.value_of(key)
                .cmp(&a.value_of(key))
                .then(seq_a.cmp(seq_b))
        });

        Ok(ranked
            .into_iter()
            .take(n)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

const SELECT_COLUMNS: &str = r#"user_id, display_name, follower, following, "like", hate, balance,
    last_post_time, last_feed_time, last_event_time, last_checkin_time"#;

/// SQLite implementation of UserRepository
///
/// Connections are checked out of the pool per call and returned when the
/// call's future completes, whichever way it exits.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `url`.
    /// `sqlite::memory:` needs `max_connections == 1` to see a single database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                follower INTEGER NOT NULL DEFAULT 0,
                following INTEGER NOT NULL DEFAULT 0,
                "like" INTEGER NOT NULL DEFAULT 0,
                hate INTEGER NOT NULL DEFAULT 0,
                balance INTEGER NOT NULL DEFAULT 0,
                last_post_time TEXT,
                last_feed_time TEXT,
                last_event_time TEXT,
                last_checkin_time TEXT
            )"#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create users table");
            StorageError::from(e)
        })?;

        debug!("Users table ready");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[instrument(skip(self))]
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id, "Failed to fetch user from database");
            StorageError::from(e)
        })?;

        debug!(user_id, found = record.is_some(), "Fetched user from database");
        Ok(record)
    }

    #[instrument(skip(self, record), fields(user_id = %record.user_id))]
    async fn upsert(&self, record: &UserRecord) -> Result<(), StorageError> {
        // ON CONFLICT updates in place, so rowid (the ranking tiebreak) is kept
        sqlx::query(
            r#"INSERT INTO users (user_id, display_name, follower, following, "like", hate, balance,
                last_post_time, last_feed_time, last_event_time, last_checkin_time)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                follower = excluded.follower,
                following = excluded.following,
                "like" = excluded."like",
                hate = excluded.hate,
                balance = excluded.balance,
                last_post_time = excluded.last_post_time,
                last_feed_time = excluded.last_feed_time,
                last_event_time = excluded.last_event_time,
                last_checkin_time = excluded.last_checkin_time"#,
        )
        .bind(&record.user_id)
        .bind(&record.display_name)
        .bind(record.follower)
        .bind(record.following)
        .bind(record.like)
        .bind(record.hate)
        .bind(record.balance)
        .bind(&record.last_post_time)
        .bind(&record.last_feed_time)
        .bind(&record.last_event_time)
        .bind(&record.last_checkin_time)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to upsert user in database");
            StorageError::from(e)
        })?;

        debug!("User upserted in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id, "Failed to delete user from database");
                StorageError::from(e)
            })?;

        let removed = result.rows_affected() > 0;
        debug!(user_id, removed, "User deleted from database");
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn top_n(&self, n: usize, key: SortKey) -> Result<Vec<UserRecord>, StorageError> {
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM users ORDER BY {} DESC, rowid ASC LIMIT ?",
            key.column()
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, %key, "Failed to rank users in database");
            StorageError::from(e)
        })?;

        Ok(records)
    }
}
