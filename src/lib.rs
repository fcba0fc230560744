// Library crate for the Distagram server
// This file exposes the public API for integration tests

pub mod clock;
pub mod config;
pub mod cooldown;
pub mod engine;
pub mod ledger;
pub mod outcome;
pub mod routes;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use engine::{ActionEngine, ActionError, ActionKind, ActionOutcome, ActionPolicy, Rejection};
pub use ledger::LedgerService;
pub use outcome::{
    OutcomeCatalog, OutcomeEffect, OutcomeEntry, OutcomeTable, SharedRng, StatDelta,
};
pub use routes::build_router;
pub use shared::{AppError, AppState};
pub use user::{
    InMemoryUserRepository, SortKey, StorageError, UserLocks, UserRecord, UserRepository,
};
