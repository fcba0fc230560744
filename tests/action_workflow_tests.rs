use chrono::Duration;
use futures::future::join_all;
use std::sync::Arc;

use distagram::{
    outcome::catalog::post_table, ActionError, ActionKind, OutcomeCatalog, OutcomeEffect,
    OutcomeEntry, OutcomeTable, Rejection, StatDelta,
};

mod utils;

use utils::*;

fn viral_only_posts() -> OutcomeTable {
    OutcomeTable::new(vec![OutcomeEntry::delta(
        "viral",
        StatDelta::stats(10, 0, 30, 0),
        1.0,
    )])
    .unwrap()
}

fn reset_only_events() -> OutcomeTable {
    OutcomeTable::new(vec![OutcomeEntry::reset("hacked", 1.0)]).unwrap()
}

#[tokio::test]
async fn test_register_unregister_register_starts_fresh() {
    let setup = TestSetupBuilder::new().with_users(vec!["alice"]).build().await;

    setup
        .engine
        .perform_now("alice", ActionKind::CheckIn)
        .await
        .unwrap();
    assert_eq!(setup.record("alice").await.unwrap().balance, 100);

    setup.engine.unregister("alice").await.unwrap();
    assert!(setup.record("alice").await.is_none());

    let record = setup.engine.register("alice", "alice again").await.unwrap();
    assert_eq!(record.balance, 0);
    assert_eq!(record.last_checkin_time, None);

    // Fresh record means today's check-in is available again
    setup
        .engine
        .perform_now("alice", ActionKind::CheckIn)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_double_registration_is_rejected() {
    let setup = TestSetupBuilder::new().with_users(vec!["alice"]).build().await;

    let err = setup.engine.register("alice", "other").await.unwrap_err();
    assert_eq!(err.rejection(), Some(&Rejection::AlreadyRegistered));
    assert_eq!(setup.record("alice").await.unwrap().display_name, "alice-name");
}

#[tokio::test]
async fn test_actions_require_registration() {
    let setup = TestSetupBuilder::new().build().await;

    for kind in [
        ActionKind::Post,
        ActionKind::Feed,
        ActionKind::Event,
        ActionKind::CheckIn,
    ] {
        let err = setup.engine.perform_now("ghost", kind).await.unwrap_err();
        assert_eq!(err.rejection(), Some(&Rejection::NotRegistered));
    }
    assert!(setup.record("ghost").await.is_none());
}

#[tokio::test]
async fn test_checkin_once_per_calendar_day() {
    let setup = TestSetupBuilder::new().with_users(vec!["alice"]).build().await;

    let outcome = setup
        .engine
        .perform_now("alice", ActionKind::CheckIn)
        .await
        .unwrap();
    assert_eq!(outcome.record.balance, 100);
    assert_eq!(outcome.effect, OutcomeEffect::Delta(StatDelta::balance(100)));

    // Later the same day
    setup.clock.advance(Duration::hours(11));
    let err = setup
        .engine
        .perform_now("alice", ActionKind::CheckIn)
        .await
        .unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&Rejection::AlreadyCheckedIn {
            remaining: Duration::hours(1)
        })
    );
    assert_eq!(setup.record("alice").await.unwrap().balance, 100);

    // Just past midnight
    setup.clock.advance(Duration::hours(1));
    let outcome = setup
        .engine
        .perform_now("alice", ActionKind::CheckIn)
        .await
        .unwrap();
    assert_eq!(outcome.record.balance, 200);
}

#[tokio::test]
async fn test_post_cooldown_window() {
    let setup = TestSetupBuilder::new().with_users(vec!["alice"]).build().await;

    setup
        .engine
        .perform_now("alice", ActionKind::Post)
        .await
        .unwrap();

    setup.clock.advance(Duration::seconds(10));
    let err = setup
        .engine
        .perform_now("alice", ActionKind::Post)
        .await
        .unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&Rejection::OnCooldown {
            action: ActionKind::Post,
            remaining: Duration::seconds(5)
        })
    );

    // Cooldowns are independent per action
    setup
        .engine
        .perform_now("alice", ActionKind::Event)
        .await
        .unwrap();

    setup.clock.advance(Duration::seconds(5));
    setup
        .engine
        .perform_now("alice", ActionKind::Post)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_outcomes_keep_stats_consistent() {
    let setup = TestSetupBuilder::new()
        .with_users(vec!["alice"])
        .unlimited()
        .build()
        .await;

    for _ in 0..300 {
        setup
            .engine
            .perform_now("alice", ActionKind::Post)
            .await
            .unwrap();
    }

    // Viral adds 10 followers per 30 likes, backlash removes 10 per 30 hates
    let record = setup.record("alice").await.unwrap();
    assert_eq!(record.follower * 3, record.like - record.hate);
    assert!(record.like > 0);
    assert!(record.hate > 0);
    assert_eq!(record.following, 0);
    assert_eq!(record.balance, 0);
}

#[tokio::test]
async fn test_reset_event_zeroes_stats_but_keeps_balance() {
    let catalog = OutcomeCatalog::new(viral_only_posts(), reset_only_events());
    let setup = TestSetupBuilder::new()
        .with_users(vec!["alice"])
        .with_catalog(catalog)
        .unlimited()
        .build()
        .await;

    for kind in [ActionKind::Post, ActionKind::Post, ActionKind::CheckIn] {
        setup.engine.perform_now("alice", kind).await.unwrap();
    }
    let before = setup.record("alice").await.unwrap();
    assert_eq!((before.follower, before.like), (20, 60));

    let outcome = setup
        .engine
        .perform_now("alice", ActionKind::Event)
        .await
        .unwrap();
    assert_eq!(outcome.effect, OutcomeEffect::Reset);

    let after = setup.record("alice").await.unwrap();
    assert_eq!(
        (after.follower, after.following, after.like, after.hate),
        (0, 0, 0, 0)
    );
    assert_eq!(after.balance, 100);
    assert!(after.last_event_time.is_some());
    assert_eq!(after.last_post_time, before.last_post_time);
}

#[tokio::test]
async fn test_feed_changes_nothing_but_its_timestamp() {
    let setup = TestSetupBuilder::new().with_users(vec!["alice"]).build().await;
    let before = setup.record("alice").await.unwrap();

    let outcome = setup
        .engine
        .perform_now("alice", ActionKind::Feed)
        .await
        .unwrap();

    assert_eq!(outcome.title.to_string(), "Ordinary");
    let mut expected = before;
    expected.last_feed_time = Some("2024-03-01 12:00:00".to_string());
    assert_eq!(setup.record("alice").await.unwrap(), expected);
}

#[tokio::test]
async fn test_rejections_write_nothing() {
    let repo = Arc::new(CountingUserRepository::new());
    let setup = TestSetupBuilder::new()
        .with_repository(repo.clone())
        .with_users(vec!["alice"])
        .build()
        .await;

    setup
        .engine
        .perform_now("alice", ActionKind::Event)
        .await
        .unwrap();
    let writes = repo.upsert_count();
    let snapshot = setup.record("alice").await.unwrap();

    for _ in 0..5 {
        let err = setup
            .engine
            .perform_now("alice", ActionKind::Event)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Rejected(Rejection::OnCooldown { .. })));
    }
    setup
        .engine
        .perform_now("nobody", ActionKind::Post)
        .await
        .unwrap_err();

    assert_eq!(repo.upsert_count(), writes);
    assert_eq!(setup.record("alice").await.unwrap(), snapshot);
}

#[tokio::test]
async fn test_storage_failure_leaves_record_untouched() {
    let repo = Arc::new(FailingUserRepository::new());
    let setup = TestSetupBuilder::new()
        .with_repository(repo.clone())
        .with_users(vec!["alice"])
        .build()
        .await;

    repo.set_fail_writes(true);
    let err = setup
        .engine
        .perform_now("alice", ActionKind::CheckIn)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Storage(_)));
    assert!(err.rejection().is_none());

    let record = setup.record("alice").await.unwrap();
    assert_eq!(record.balance, 0);
    assert_eq!(record.last_checkin_time, None);

    // Nothing was stamped, so the retry is not on cooldown
    repo.set_fail_writes(false);
    let outcome = setup
        .engine
        .perform_now("alice", ActionKind::CheckIn)
        .await
        .unwrap();
    assert_eq!(outcome.record.balance, 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_actions_on_one_user_lose_no_updates() {
    let setup = TestSetupBuilder::new()
        .with_users(vec!["alice"])
        .unlimited()
        .build()
        .await;

    let handles = (0..50).map(|_| {
        let engine = setup.engine.clone();
        tokio::spawn(async move { engine.perform_now("alice", ActionKind::CheckIn).await })
    });
    for result in join_all(handles).await {
        result.unwrap().unwrap();
    }

    assert_eq!(setup.record("alice").await.unwrap().balance, 5000);
}

#[tokio::test]
async fn test_standard_post_table_has_three_equal_outcomes() {
    let table = post_table().unwrap();
    let weights: Vec<f64> = table.entries().iter().map(|e| e.weight).collect();
    assert_eq!(weights.len(), 3);
    assert!(weights.windows(2).all(|w| w[0] == w[1]));
}
