use std::sync::Arc;

use distagram::user::SqliteUserRepository;
use distagram::{
    build_router, ActionEngine, AppConfig, AppState, LedgerService, SharedRng, SystemClock,
    UserLocks,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "distagram=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    info!(database_url = %config.database_url, "Starting Distagram server");

    let repository = SqliteUserRepository::connect(&config.database_url, config.max_connections)
        .await?;
    repository.migrate().await?;
    let repository = Arc::new(repository);

    // Engine and ledger must serialize on the same per-user locks
    let locks = Arc::new(UserLocks::new());
    let rng = match config.rng_seed {
        Some(seed) => {
            info!(seed, "Using fixed RNG seed");
            SharedRng::seeded(seed)
        }
        None => SharedRng::from_os(),
    };

    let engine = ActionEngine::builder(repository.clone())
        .with_locks(locks.clone())
        .with_rng(Arc::new(rng))
        .with_clock(Arc::new(SystemClock))
        .with_policy(config.action_policy())
        .build()?;
    let ledger = LedgerService::new(repository, locks);

    let app_state = AppState::new(Arc::new(engine), Arc::new(ledger), config.ranking_limit);
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
