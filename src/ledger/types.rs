use serde::{Deserialize, Serialize};

/// Query string for GET /ledger/top
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

/// Request payload for a privileged balance change
#[derive(Debug, Deserialize, Serialize)]
pub struct AdjustBalanceRequest {
    pub delta: i64,
    pub reason: String,
}
