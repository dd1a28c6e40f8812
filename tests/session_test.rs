use gem_session::clients::ActorClient;
use gem_session::config::{GemTemplate, PoolConfig, SessionConfig, ValueRange, WeightRange};
use gem_session::lifecycle::{spawn_batch, GemSession, SessionError, SessionEvent, SessionReply};
use gem_session::model::{BackpackUpdate, CollectOutcome, GemId, GemKind, NoticeKind, PoolStatus, Position};
use gem_session::pool_actor::PoolError;
use std::collections::HashSet;
use std::time::Duration;

fn config(initial_spawn: usize) -> SessionConfig {
    let mut config = SessionConfig::default();
    config.pool.seed = Some(42);
    config.pool.initial_spawn = initial_spawn;
    config.pool.spawn_interval_ms = 0;
    config
}

fn fixed(value: i32, weight: f32) -> Option<GemTemplate> {
    Some(GemTemplate {
        value: ValueRange {
            min: value,
            max: value,
        },
        weight: WeightRange {
            min: weight,
            max: weight,
        },
    })
}

async fn started(config: SessionConfig) -> GemSession {
    let mut session = GemSession::start(config)
        .await
        .expect("Failed to start session");
    session
        .wait_for_spawning()
        .await
        .expect("Initial spawning failed");
    session
}

/// Full end-to-end run with all real actors.
#[tokio::test]
async fn test_full_session_flow() {
    let session = started(config(10)).await;

    let census = session.pool.census(session.pool_id()).await.unwrap();
    assert_eq!(census.active, 10);
    assert_eq!(census.slots, 20);

    let gems = session.active_gems().await.unwrap();
    let first = gems[0].clone();
    let reply = session
        .handle(SessionEvent::EnteredRange(first.id))
        .await
        .unwrap();
    assert!(matches!(reply, SessionReply::Collected(CollectOutcome::Accepted(r)) if r.gem_id == first.id));

    // Backfill keeps the scene populated.
    let census = session.pool.census(session.pool_id()).await.unwrap();
    assert_eq!(census.active, 10);
    assert_eq!(census.released, 1);

    let SessionReply::Rendered(view) = session.handle(SessionEvent::RenderRequested).await.unwrap()
    else {
        panic!("Expected Rendered reply");
    };
    assert_eq!(view.backpack.held_count, 1);
    assert_eq!(view.stats.total_collected(), 1);
    assert_eq!(view.stats.collected_value(), i64::from(first.value));
    assert_eq!(view.last_collection.unwrap().gem_id, first.id);

    let reply = session.handle(SessionEvent::DepositRequested).await.unwrap();
    assert!(matches!(reply, SessionReply::Deposited(1)));

    let stats = session.stats.snapshot(session.stats_id()).await.unwrap();
    assert_eq!(stats.total_deposited(), 1);
    assert_eq!(stats.most_frequent_deposited_kind(), Some(first.kind));

    session.shutdown().await.expect("Failed to shutdown session");
}

/// A gem can only be collected once.
#[tokio::test]
async fn test_gem_is_collected_at_most_once() {
    let session = started(config(3)).await;
    let gem = session.active_gems().await.unwrap()[0].clone();

    assert!(session.try_collect(gem.id).await.unwrap().accepted());
    assert_eq!(
        session.try_collect(gem.id).await.unwrap(),
        CollectOutcome::Unavailable
    );

    session.shutdown().await.unwrap();
}

/// Held weight reaching the ceiling exactly is allowed, one more gem is not.
#[tokio::test]
async fn test_capacity_boundary() {
    let mut config = config(0);
    config.pool.rare_chance = 0.0;
    config.pool.common = fixed(20, 45.0);
    config.pool.rare = fixed(60, 5.0);
    let mut session = started(config).await;
    let pool_id = session.pool_id();

    let heavy = session.pool.activate_one(pool_id).await.unwrap().unwrap();
    let second = session.pool.activate_one(pool_id).await.unwrap().unwrap();
    assert!(session.try_collect(heavy.id).await.unwrap().accepted());

    let rejected = session.try_collect(second.id).await.unwrap();
    assert_eq!(
        rejected,
        CollectOutcome::OverCapacity {
            gem_weight: 45.0,
            held_weight: 45.0,
            ceiling: 50.0,
        }
    );
    let view = session.view().await.unwrap();
    assert_eq!(view.notice.unwrap().kind, NoticeKind::CapacityExceeded);
    assert_eq!(view.backpack.held_weight, 45.0);
    // The rejected gem stays in the scene.
    assert!(session
        .active_gems()
        .await
        .unwrap()
        .iter()
        .any(|g| g.id == second.id));

    session.set_rare_chance(1.0).await.unwrap();
    let light = session.pool.activate_one(pool_id).await.unwrap().unwrap();
    assert_eq!(light.kind, GemKind::Rare);
    assert!(session.try_collect(light.id).await.unwrap().accepted());
    assert_eq!(session.view().await.unwrap().backpack.held_weight, 50.0);

    session.shutdown().await.unwrap();
}

/// Concurrent collection events never push the held weight past the ceiling.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_collection_storm() {
    let session = started(config(30)).await;
    let gems = session.active_gems().await.unwrap();
    assert_eq!(gems.len(), 30);

    let mut handles = vec![];
    for gem in &gems {
        for _ in 0..2 {
            let backpack = session.backpack.clone();
            let backpack_id = session.backpack_id();
            let gem_id = gem.id;
            handles.push(tokio::spawn(async move {
                backpack.try_collect(backpack_id, gem_id).await
            }));
        }
    }

    let mut accepted = vec![];
    for handle in handles {
        if let CollectOutcome::Accepted(record) = handle.await.unwrap().unwrap() {
            accepted.push(record.gem_id);
        }
    }

    let unique: HashSet<GemId> = accepted.iter().copied().collect();
    assert_eq!(unique.len(), accepted.len(), "A gem was collected twice");

    let view = session.view().await.unwrap();
    assert!(view.backpack.held_weight <= view.backpack.weight_ceiling);
    assert_eq!(view.backpack.held_count, accepted.len());
    assert_eq!(view.stats.total_collected(), accepted.len() as u64);

    // Conservation: every slot ever created is pooled, active or released,
    // and every released slot's gem is held or deposited.
    let census = view.census;
    assert_eq!(census.slots, census.pooled + census.active + census.released);
    assert_eq!(
        census.released,
        view.backpack.held_count + view.backpack.deposited_count
    );

    session.shutdown().await.unwrap();
}

/// Top-K deposit returns the most valuable gems and keeps the rest in order.
#[tokio::test]
async fn test_deposit_top_valuable() {
    let session = started(config(8)).await;
    for gem in session.active_gems().await.unwrap().into_iter().take(6) {
        session.try_collect(gem.id).await.unwrap();
    }
    let before = session
        .backpack
        .held_by_value(session.backpack_id())
        .await
        .unwrap();
    let held = session
        .backpack
        .get(session.backpack_id())
        .await
        .unwrap()
        .unwrap();
    let held_order: Vec<GemId> = held.held().iter().map(|g| g.id).collect();

    let top = session.deposit_top_valuable(3).await.unwrap();
    let k = top.len();
    assert_eq!(k, before.len().min(3));
    assert!(top.windows(2).all(|w| w[0].value >= w[1].value));

    let after = session
        .backpack
        .get(session.backpack_id())
        .await
        .unwrap()
        .unwrap();
    let remaining: Vec<GemId> = after.held().iter().map(|g| g.id).collect();
    let expected: Vec<GemId> = held_order
        .into_iter()
        .filter(|id| top.iter().all(|g| g.id != *id))
        .collect();
    assert_eq!(remaining, expected);
    let lowest_moved = top.iter().map(|g| g.value).min().unwrap_or(i32::MAX);
    assert!(after.held().iter().all(|g| g.value <= lowest_moved));

    let stats = session.stats.snapshot(session.stats_id()).await.unwrap();
    assert_eq!(stats.total_deposited(), k as u64);
    let collected: i64 = before.iter().map(|g| i64::from(g.value)).sum();
    assert_eq!(stats.collected_value(), collected);
    assert_eq!(
        stats.average_collected_value(),
        collected as f64 / before.len() as f64
    );

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_deactivated_gem_cannot_be_collected() {
    let session = started(config(2)).await;
    let gem = session.active_gems().await.unwrap()[0].clone();

    assert!(session.deactivate(gem.id).await.unwrap());
    assert!(!session.deactivate(gem.id).await.unwrap());
    assert_eq!(
        session.try_collect(gem.id).await.unwrap(),
        CollectOutcome::Unavailable
    );

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_missing_common_template_disables_pool() {
    let mut config = config(5);
    config.pool.common = None;
    let mut session = GemSession::start(config).await.unwrap();
    assert_eq!(session.wait_for_spawning().await.unwrap(), 0);

    let pool = session
        .pool
        .get(session.pool_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pool.status(), PoolStatus::Disabled);
    assert!(session.active_gems().await.unwrap().is_empty());
    assert_eq!(session.scene(None).await.unwrap().total, 0);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_config_and_tuning_are_rejected() {
    let mut bad = config(0);
    bad.pool.rare_chance = 2.0;
    assert!(matches!(
        GemSession::start(bad).await,
        Err(SessionError::Config(_))
    ));

    let mut session = started(config(0)).await;
    let err = session.set_rare_chance(1.5).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Pool(PoolError::InvalidRareChance(c)) if c == 1.5
    ));
    assert_eq!(session.config().pool.rare_chance, 0.1);

    session.shutdown().await.unwrap();
}

/// A pool config the session never validated is refused by the pool actor,
/// which keeps serving the session's own pool.
#[tokio::test]
async fn test_pool_rejects_inverted_template_and_survives() {
    let session = started(config(0)).await;
    let bad = PoolConfig {
        common: Some(GemTemplate {
            value: ValueRange { min: 40, max: 10 },
            weight: WeightRange { min: 1.0, max: 2.0 },
        }),
        ..PoolConfig::default()
    };
    let err = session.pool.create_pool(bad).await.unwrap_err();
    assert!(matches!(err, PoolError::InvalidConfig(_)));

    let gem = session.pool.activate_one(session.pool_id()).await.unwrap();
    assert!(gem.is_some());
    let census = session.pool.census(session.pool_id()).await.unwrap();
    assert_eq!(census.active, 1);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_seeded_sessions_spawn_identically() {
    let first = started(config(12)).await;
    let second = started(config(12)).await;

    let a = first.spawn_history().await.unwrap();
    let b = second.spawn_history().await.unwrap();
    assert_eq!(a.len(), 12);
    let key = |r: &gem_session::model::SpawnRecord| (r.gem_id, r.kind, r.value, r.weight);
    assert_eq!(
        a.iter().map(key).collect::<Vec<_>>(),
        b.iter().map(key).collect::<Vec<_>>()
    );

    first.shutdown().await.unwrap();
    second.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_scene_report_matches_active_gems() {
    let session = started(config(10)).await;
    let gems = session.active_gems().await.unwrap();
    let report = session.scene(Some(Position::ORIGIN)).await.unwrap();

    assert_eq!(report.total, gems.len());
    assert_eq!(report.value.min, gems.iter().map(|g| g.value).min().unwrap());
    assert_eq!(report.value.max, gems.iter().map(|g| g.value).max().unwrap());
    assert_eq!(
        report.rare_count,
        gems.iter().filter(|g| g.kind == GemKind::Rare).count()
    );
    assert_eq!(report.preview.len(), 5);
    assert!(report.nearest.is_some());

    session.shutdown().await.unwrap();
}

/// Cancelling a staggered batch keeps the gems it already activated.
#[tokio::test(start_paused = true)]
async fn test_cancelled_batch_keeps_spawned_gems() {
    let mut session = started(config(0)).await;
    session.spawn_batch(5, Duration::from_millis(100));

    // Activations at 0, 100 and 200 ms.
    tokio::time::sleep(Duration::from_millis(250)).await;
    session.cancel_spawning();
    assert_eq!(session.wait_for_spawning().await.unwrap(), 3);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let census = session.pool.census(session.pool_id()).await.unwrap();
    assert_eq!(census.active, 3);

    session.shutdown().await.unwrap();
}

/// With no interval the batch checks for cancellation between activations.
#[tokio::test]
async fn test_cancelled_back_to_back_batch_stops_after_first_gem() {
    let session = started(config(0)).await;
    let mut batch = spawn_batch(session.pool.clone(), session.pool_id(), 5, Duration::ZERO);
    // The batch task has not been polled yet on this single-threaded runtime.
    batch.cancel();
    while !batch.is_finished() {
        tokio::task::yield_now().await;
    }
    assert_eq!(batch.finish().await.unwrap(), 1);

    let census = session.pool.census(session.pool_id()).await.unwrap();
    assert_eq!(census.active, 1);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_retuned_notice_duration_applies_to_next_notice() {
    let mut session = started(config(0)).await;
    session
        .retune_backpack(BackpackUpdate {
            notice_duration_ms: Some(500),
            high_value_threshold: Some(5),
        })
        .await
        .unwrap();
    assert_eq!(session.config().backpack.notice_duration_ms, 500);

    assert_eq!(session.deposit_all().await.unwrap(), 0);
    let view = session.view().await.unwrap();
    assert_eq!(view.backpack.high_value_threshold, 5);
    assert!(view.notice.is_some());

    tokio::time::sleep(Duration::from_millis(499)).await;
    assert!(session.view().await.unwrap().notice.is_some());

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(session.view().await.unwrap().notice.is_none());

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_notice_expires() {
    let mut config = config(0);
    config.backpack.notice_duration_ms = 2_000;
    let session = started(config).await;

    assert_eq!(session.deposit_all().await.unwrap(), 0);
    let notice = session.view().await.unwrap().notice.unwrap();
    assert_eq!(notice.kind, NoticeKind::NothingToDeposit);
    assert_eq!(notice.message(), "No gems to deposit.");

    tokio::time::sleep(Duration::from_millis(1_999)).await;
    assert!(session.view().await.unwrap().notice.is_some());

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(session.view().await.unwrap().notice.is_none());

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_default_pool_config_is_enabled() {
    let session = started(SessionConfig {
        pool: PoolConfig {
            initial_spawn: 0,
            ..PoolConfig::default()
        },
        ..SessionConfig::default()
    })
    .await;
    let pool = session.pool.get(session.pool_id()).await.unwrap().unwrap();
    assert!(pool.is_enabled());
    session.shutdown().await.unwrap();
}
