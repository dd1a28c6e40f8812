//! # Gem Session Demo
//!
//! Plays a short scripted session: waits for the initial population, walks
//! the backpack over the most valuable gems in the scene until it is full,
//! deposits the best of them, then everything else.
//!
//! An optional first argument names a TOML config file; otherwise the
//! built-in configuration is used.

use anyhow::Context;
use gem_session::config::SessionConfig;
use gem_session::lifecycle::{setup_tracing, GemSession, SessionEvent, SessionReply};
use gem_session::model::{CollectOutcome, Position};
use std::path::PathBuf;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => SessionConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SessionConfig::builtin().context("loading built-in config")?,
    };

    let mut session = GemSession::start(config).await?;
    let spawned = session.wait_for_spawning().await?;
    info!(spawned, "Initial population ready");

    let scene = session.scene(Some(Position::ORIGIN)).await?;
    info!(
        total = scene.total,
        mean_value = scene.value.mean,
        rare = scene.rare_count,
        high_value = scene.high_value_count,
        "Scene analysed"
    );
    if let Some(nearest) = scene.nearest {
        info!(gem_id = %nearest.gem_id, distance = nearest.distance, "Nearest gem");
    }

    let span = tracing::info_span!("collecting");
    async {
        let mut gems = session.active_gems().await?;
        gems.sort_by(|a, b| b.value.cmp(&a.value));
        for gem in gems {
            match session.handle(SessionEvent::EnteredRange(gem.id)).await? {
                SessionReply::Collected(CollectOutcome::OverCapacity { .. }) => {
                    warn!(gem_id = %gem.id, weight = gem.weight, "Too heavy, stopping");
                    break;
                }
                SessionReply::Collected(outcome) => info!(accepted = outcome.accepted(), "Pickup"),
                _ => {}
            }
        }
        anyhow::Ok(())
    }
    .instrument(span)
    .await?;

    if let SessionReply::DepositedTop(top) = session.handle(SessionEvent::DepositTopRequested(3)).await? {
        let values: Vec<i32> = top.iter().map(|gem| gem.value).collect();
        info!(?values, "Deposited the most valuable gems");
    }
    session.handle(SessionEvent::DepositRequested).await?;

    if let SessionReply::Rendered(view) = session.handle(SessionEvent::RenderRequested).await? {
        info!(
            collected = view.stats.total_collected(),
            deposited = view.stats.total_deposited(),
            average = view.stats.average_collected_value(),
            favourite = ?view.stats.most_frequent_collected_kind(),
            census = ?view.census,
            notice = view.notice.as_ref().map(|n| n.message()),
            "Session summary"
        );
    }

    session.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}
