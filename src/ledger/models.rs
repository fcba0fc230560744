use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based
    pub rank: usize,
    pub display_name: String,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    pub display_name: String,
    pub balance: i64,
}

/// Record of a privileged balance change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAdjustment {
    pub user_id: String,
    pub display_name: String,
    pub delta: i64,
    pub reason: String,
    pub new_balance: i64,
}
