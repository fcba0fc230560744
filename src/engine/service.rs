use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, error, info, instrument, warn};

use super::{
    errors::{ActionError, Rejection},
    models::{ActionKind, ActionOutcome, ActionPolicy},
    title::Title,
};
use crate::{
    clock::{Clock, SystemClock},
    cooldown::CooldownPolicy,
    outcome::{
        OutcomeCatalog, OutcomeEffect, OutcomeTable, OutcomeTableError, SharedRng, StatDelta,
    },
    user::{UserLocks, UserRecord, UserRepository},
};

/// Resolves user actions against the record store.
///
/// Each call holds the user's lock from load to write, so two actions for the
/// same user never interleave. A rejection writes nothing; a successful action
/// writes the record exactly once.
pub struct ActionEngine {
    repository: Arc<dyn UserRepository>,
    locks: Arc<UserLocks>,
    catalog: OutcomeCatalog,
    rng: Arc<SharedRng>,
    clock: Arc<dyn Clock>,
    policy: ActionPolicy,
}

impl ActionEngine {
    pub fn builder(repository: Arc<dyn UserRepository>) -> ActionEngineBuilder {
        ActionEngineBuilder::new(repository)
    }

    pub fn locks(&self) -> Arc<UserLocks> {
        self.locks.clone()
    }

    pub fn policy(&self) -> &ActionPolicy {
        &self.policy
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Creates a zeroed record for a new user
    #[instrument(skip(self))]
    pub async fn register(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> Result<UserRecord, ActionError> {
        let _guard = self.locks.acquire(user_id).await;

        if self.repository.get(user_id).await?.is_some() {
            debug!("Registration rejected: already registered");
            return Err(Rejection::AlreadyRegistered.into());
        }

        let record = UserRecord::new(user_id, display_name);
        self.repository.upsert(&record).await?;

        info!("User registered");
        Ok(record)
    }

    /// Deletes the user's record. Irrevocable.
    #[instrument(skip(self))]
    pub async fn unregister(&self, user_id: &str) -> Result<(), ActionError> {
        let _guard = self.locks.acquire(user_id).await;

        if !self.repository.delete(user_id).await? {
            self.locks.forget(user_id).await;
            debug!("Unregistration rejected: not registered");
            return Err(Rejection::NotRegistered.into());
        }

        self.locks.forget(user_id).await;
        info!("User unregistered");
        Ok(())
    }

    /// Performs `kind` at the clock's current time
    pub async fn perform_now(
        &self,
        user_id: &str,
        kind: ActionKind,
    ) -> Result<ActionOutcome, ActionError> {
        let now = self.clock.now();
        self.perform(user_id, kind, now).await
    }

    /// Load, check cooldown, draw, apply, stamp, persist. `now` is used for
    /// both the cooldown check and the stamp.
    #[instrument(skip(self))]
    pub async fn perform(
        &self,
        user_id: &str,
        kind: ActionKind,
        now: NaiveDateTime,
    ) -> Result<ActionOutcome, ActionError> {
        let _guard = self.locks.acquire(user_id).await;

        let Some(mut record) = self.repository.get(user_id).await? else {
            // unknown ids must not leave a lock entry behind
            self.locks.forget(user_id).await;
            return Err(Rejection::NotRegistered.into());
        };

        let cooldown = self.policy.cooldown_for(kind);
        let status = cooldown.check(kind.last_time(&record), now);
        if !status.ready {
            info!(remaining_secs = status.remaining.num_seconds(), "Action on cooldown");
            return Err(Self::cooldown_rejection(kind, cooldown, status.remaining).into());
        }

        let (label, flavor, effect) = self.resolve(kind);

        match effect {
            OutcomeEffect::Delta(delta) => {
                record = delta.applied_to(&record).ok_or_else(|| {
                    warn!(label = %label, "Outcome would overflow a counter");
                    Rejection::CounterOverflow
                })?;
            }
            OutcomeEffect::Reset => record.reset_stats(),
        }
        kind.stamp(&mut record, now);

        if let Err(err) = self.repository.upsert(&record).await {
            error!(error = %err, "Failed to persist action, nothing applied");
            return Err(err.into());
        }

        info!(label = %label, "Action applied");
        Ok(ActionOutcome {
            kind,
            label,
            flavor,
            effect,
            title: Title::for_record(&record),
            record,
            performed_at: now,
        })
    }

    fn resolve(&self, kind: ActionKind) -> (String, Option<String>, OutcomeEffect) {
        match kind {
            ActionKind::Post => self.draw(&self.catalog.post),
            ActionKind::Event => self.draw(&self.catalog.event),
            ActionKind::CheckIn => (
                "Checked in!".to_string(),
                None,
                OutcomeEffect::Delta(StatDelta::balance(self.policy.checkin_reward)),
            ),
            ActionKind::Feed => (
                "Your feed".to_string(),
                None,
                OutcomeEffect::Delta(StatDelta::default()),
            ),
        }
    }

    fn draw(&self, table: &OutcomeTable) -> (String, Option<String>, OutcomeEffect) {
        self.rng.with(|rng| {
            let draw = table.select(rng);
            (
                draw.entry.label.clone(),
                draw.flavor.map(str::to_string),
                draw.entry.effect,
            )
        })
    }

    fn cooldown_rejection(
        kind: ActionKind,
        policy: CooldownPolicy,
        remaining: Duration,
    ) -> Rejection {
        match policy {
            CooldownPolicy::CalendarDay => Rejection::AlreadyCheckedIn { remaining },
            _ => Rejection::OnCooldown {
                action: kind,
                remaining,
            },
        }
    }
}

pub struct ActionEngineBuilder {
    repository: Arc<dyn UserRepository>,
    locks: Option<Arc<UserLocks>>,
    catalog: Option<OutcomeCatalog>,
    rng: Option<Arc<SharedRng>>,
    clock: Option<Arc<dyn Clock>>,
    policy: ActionPolicy,
}

impl ActionEngineBuilder {
    fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            repository,
            locks: None,
            catalog: None,
            rng: None,
            clock: None,
            policy: ActionPolicy::default(),
        }
    }

    /// Share a lock registry with other components that mutate records
    pub fn with_locks(mut self, locks: Arc<UserLocks>) -> Self {
        self.locks = Some(locks);
        self
    }

    pub fn with_catalog(mut self, catalog: OutcomeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_rng(mut self, rng: Arc<SharedRng>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_policy(mut self, policy: ActionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fails when the standard outcome tables are malformed
    pub fn build(self) -> Result<ActionEngine, OutcomeTableError> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => OutcomeCatalog::standard()?,
        };

        Ok(ActionEngine {
            repository: self.repository,
            locks: self.locks.unwrap_or_default(),
            catalog,
            rng: self.rng.unwrap_or_default(),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            policy: self.policy,
        })
    }
}
