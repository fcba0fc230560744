// Public API - what other modules can use
pub use errors::{ActionError, Rejection};
pub use handlers::{perform_action, register_user, unregister_user};
pub use models::{ActionKind, ActionOutcome, ActionPolicy};
pub use service::{ActionEngine, ActionEngineBuilder};
pub use title::Title;

// Internal modules
mod errors;
mod handlers;
pub mod models;
pub mod service;
mod title;
pub mod types;
