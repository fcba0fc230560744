use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

use distagram::{
    ActionEngine, ActionPolicy, LedgerService, ManualClock, OutcomeCatalog, SharedRng,
    UserLocks, UserRecord, UserRepository,
};

use super::mocks::CountingUserRepository;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Noon on an arbitrary fixed day
pub fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub struct TestSetup {
    pub engine: Arc<ActionEngine>,
    pub ledger: Arc<LedgerService>,
    pub repository: Arc<dyn UserRepository>,
    pub clock: Arc<ManualClock>,
}

impl TestSetup {
    pub async fn record(&self, user_id: &str) -> Option<UserRecord> {
        self.repository.get(user_id).await.unwrap()
    }
}

pub struct TestSetupBuilder {
    users: Vec<String>,
    policy: ActionPolicy,
    catalog: Option<OutcomeCatalog>,
    repository: Option<Arc<dyn UserRepository>>,
    seed: u64,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            policy: ActionPolicy::default(),
            catalog: None,
            repository: None,
            seed: 7,
        }
    }

    pub fn with_users(mut self, users: Vec<&str>) -> Self {
        self.users = users.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_policy(mut self, policy: ActionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn unlimited(self) -> Self {
        self.with_policy(ActionPolicy::unlimited())
    }

    pub fn with_catalog(mut self, catalog: OutcomeCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_repository(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    #[allow(dead_code)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub async fn build(self) -> TestSetup {
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(CountingUserRepository::new()));
        let clock = Arc::new(ManualClock::new(start_time()));
        let locks = Arc::new(UserLocks::new());

        let mut builder = ActionEngine::builder(repository.clone())
            .with_locks(locks.clone())
            .with_rng(Arc::new(SharedRng::seeded(self.seed)))
            .with_clock(clock.clone())
            .with_policy(self.policy);
        if let Some(catalog) = self.catalog {
            builder = builder.with_catalog(catalog);
        }
        let engine = Arc::new(builder.build().unwrap());
        let ledger = Arc::new(LedgerService::new(repository.clone(), locks));

        for user in &self.users {
            engine
                .register(user, &format!("{user}-name"))
                .await
                .unwrap();
        }

        TestSetup {
            engine,
            ledger,
            repository,
            clock,
        }
    }
}
