use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::models::{BalanceAdjustment, BalanceView, RankingEntry};
use crate::{
    engine::{ActionError, Rejection},
    user::{SortKey, StorageError, UserLocks, UserRepository},
};

/// Balance reads, rankings and privileged adjustments
pub struct LedgerService {
    repository: Arc<dyn UserRepository>,
    locks: Arc<UserLocks>,
}

impl LedgerService {
    /// `locks` must be the registry the action engine uses, otherwise an
    /// adjustment can race an action on the same user
    pub fn new(repository: Arc<dyn UserRepository>, locks: Arc<UserLocks>) -> Self {
        Self { repository, locks }
    }

    /// Highest balances first, at most `n`. Equal balances keep registration
    /// order.
    #[instrument(skip(self))]
    pub async fn top_balances(&self, n: usize) -> Result<Vec<RankingEntry>, StorageError> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let ranked = self.repository.top_n(n, SortKey::Balance).await?;
        Ok(ranked
            .into_iter()
            .enumerate()
            .map(|(index, record)| RankingEntry {
                rank: index + 1,
                display_name: record.display_name,
                balance: record.balance,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn balance(&self, user_id: &str) -> Result<BalanceView, ActionError> {
        let record = self
            .repository
            .get(user_id)
            .await?
            .ok_or(Rejection::NotRegistered)?;

        Ok(BalanceView {
            display_name: record.display_name,
            balance: record.balance,
        })
    }

    /// Adds a signed `delta` to the user's balance. No clamp is applied.
    /// Authorization is the caller's job.
    #[instrument(skip(self))]
    pub async fn adjust_balance(
        &self,
        user_id: &str,
        delta: i64,
        reason: &str,
    ) -> Result<BalanceAdjustment, ActionError> {
        let _guard = self.locks.acquire(user_id).await;

        let Some(mut record) = self.repository.get(user_id).await? else {
            self.locks.forget(user_id).await;
            return Err(Rejection::NotRegistered.into());
        };

        let current = record.balance;
        record.balance = current.checked_add(delta).ok_or_else(|| {
            warn!(balance = current, "Adjustment would overflow balance");
            Rejection::CounterOverflow
        })?;
        self.repository.upsert(&record).await?;

        info!(new_balance = record.balance, "Balance adjusted");
        Ok(BalanceAdjustment {
            user_id: record.user_id,
            display_name: record.display_name,
            delta,
            reason: reason.to_string(),
            new_balance: record.balance,
        })
    }
}
