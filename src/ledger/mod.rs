pub use handlers::{adjust_balance, get_balance, top_balances};
pub use models::{BalanceAdjustment, BalanceView, RankingEntry};
pub use service::LedgerService;

mod handlers;
pub mod models;
mod service;
pub mod types;
