use thiserror::Error;

/// Failure of the persistence layer. Surfaced to callers as-is; nothing at
/// this layer retries.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
