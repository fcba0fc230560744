mod errors;
mod locks;
pub mod models;
pub mod repository;

pub use errors::StorageError;
pub use locks::UserLocks;
pub use models::{SortKey, UserRecord};
pub use repository::{InMemoryUserRepository, SqliteUserRepository, UserRepository};
