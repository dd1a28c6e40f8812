use crate::clients::{ActorClient, BackpackClient, PoolClient, StatsClient};
use crate::config::{ConfigError, SessionConfig};
use crate::lifecycle::spawner::{spawn_batch, SpawnHandle};
use crate::model::{
    BackpackId, BackpackSummary, BackpackUpdate, CollectOutcome, CollectionRecord, Gem, GemId, Notice, PoolCensus,
    PoolId, Position, SceneReport, SessionStats, SpawnRecord, StatsId,
};
use crate::backpack_actor::BackpackError;
use crate::pool_actor::PoolError;
use crate::stats_actor::StatsError;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

/// Errors surfaced by [`GemSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Backpack error: {0}")]
    Backpack(#[from] BackpackError),

    #[error("Stats error: {0}")]
    Stats(#[from] StatsError),

    #[error("Actor task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Inbound events from the game loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The player entered the pickup range of an active gem.
    EnteredRange(GemId),
    DepositRequested,
    DepositTopRequested(usize),
    RenderRequested,
}

/// What handling a [`SessionEvent`] produced.
#[derive(Debug, Clone)]
pub enum SessionReply {
    Collected(CollectOutcome),
    Deposited(usize),
    DepositedTop(Vec<Gem>),
    Rendered(SessionView),
}

/// Everything a display layer needs for one frame. Read-only copies.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub backpack: BackpackSummary,
    pub stats: SessionStats,
    pub census: PoolCensus,
    pub notice: Option<Notice>,
    pub last_collection: Option<CollectionRecord>,
}

/// A running gem session: one pool, one backpack and one statistics tracker,
/// each owned by its own actor.
///
/// # Architecture
///
/// - **Stats Actor**: running totals (`Context = ()`)
/// - **Pool Actor**: slots, activation and claims (`Context = ()`)
/// - **Backpack Actor**: held and deposited gems (`Context = (PoolClient, StatsClient)`)
///
/// # Example
///
/// ```ignore
/// let mut session = GemSession::start(SessionConfig::builtin()?).await?;
/// session.wait_for_spawning().await?;
///
/// let gem = session.active_gems().await?[0].clone();
/// session.handle(SessionEvent::EnteredRange(gem.id)).await?;
/// session.handle(SessionEvent::DepositRequested).await?;
///
/// session.shutdown().await?;
/// ```
pub struct GemSession {
    pub pool: PoolClient,
    pub backpack: BackpackClient,
    pub stats: StatsClient,
    pool_id: PoolId,
    backpack_id: BackpackId,
    stats_id: StatsId,
    config: SessionConfig,
    spawner: Option<SpawnHandle>,
    handles: Vec<JoinHandle<()>>,
}

impl GemSession {
    /// Starts the actors, creates the session's entities and kicks off the
    /// staggered initial population.
    #[instrument(skip(config))]
    pub async fn start(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        // 1. Create actors (no dependencies yet)
        let (stats_actor, stats_client) = crate::stats_actor::new();
        let (pool_actor, pool_client) = crate::pool_actor::new();
        let (backpack_actor, backpack_client) = crate::backpack_actor::new();
        let stats = StatsClient::new(stats_client);
        let pool = PoolClient::new(pool_client);
        let backpack = BackpackClient::new(backpack_client);

        // 2. Start actors with injected context
        let handles = vec![
            tokio::spawn(stats_actor.run(())),
            tokio::spawn(pool_actor.run(())),
            tokio::spawn(backpack_actor.run((pool.clone(), stats.clone()))),
        ];

        // 3. Create the session's entities
        let stats_id = stats.create_stats().await?;
        let pool_id = pool.create_pool(config.pool.clone()).await?;
        let backpack_id = backpack
            .create_backpack(pool_id, stats_id, config.backpack.clone())
            .await?;

        let mut session = Self {
            pool,
            backpack,
            stats,
            pool_id,
            backpack_id,
            stats_id,
            config,
            spawner: None,
            handles,
        };

        let initial = session.config.pool.initial_spawn;
        if initial > 0 {
            session.spawn_batch(initial, session.config.pool.spawn_interval());
        }
        info!(%pool_id, %backpack_id, %stats_id, initial, "Session started");
        Ok(session)
    }

    pub fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    pub fn backpack_id(&self) -> BackpackId {
        self.backpack_id
    }

    pub fn stats_id(&self) -> StatsId {
        self.stats_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Maps one inbound event to its operation.
    pub async fn handle(&self, event: SessionEvent) -> Result<SessionReply, SessionError> {
        let reply = match event {
            SessionEvent::EnteredRange(gem_id) => SessionReply::Collected(self.try_collect(gem_id).await?),
            SessionEvent::DepositRequested => SessionReply::Deposited(self.deposit_all().await?),
            SessionEvent::DepositTopRequested(k) => {
                SessionReply::DepositedTop(self.deposit_top_valuable(k).await?)
            }
            SessionEvent::RenderRequested => SessionReply::Rendered(self.view().await?),
        };
        Ok(reply)
    }

    pub async fn try_collect(&self, gem_id: GemId) -> Result<CollectOutcome, SessionError> {
        Ok(self.backpack.try_collect(self.backpack_id, gem_id).await?)
    }

    pub async fn deposit_all(&self) -> Result<usize, SessionError> {
        Ok(self.backpack.deposit_all(self.backpack_id).await?)
    }

    pub async fn deposit_top_valuable(&self, k: usize) -> Result<Vec<Gem>, SessionError> {
        Ok(self.backpack.deposit_top_valuable(self.backpack_id, k).await?)
    }

    /// Returns an active gem to the pool without collecting it.
    pub async fn deactivate(&self, gem_id: GemId) -> Result<bool, SessionError> {
        Ok(self.pool.deactivate(self.pool_id, gem_id).await?)
    }

    pub async fn active_gems(&self) -> Result<Vec<Gem>, SessionError> {
        Ok(self.pool.active_gems(self.pool_id).await?)
    }

    pub async fn spawn_history(&self) -> Result<Vec<SpawnRecord>, SessionError> {
        Ok(self.pool.spawn_history(self.pool_id).await?)
    }

    /// Scene analysis over the active gems, with distances from `observer`.
    pub async fn scene(&self, observer: Option<Position>) -> Result<SceneReport, SessionError> {
        let scene = self.config.scene.clone();
        Ok(self.pool.analyze(self.pool_id, observer, scene).await?)
    }

    /// One read-only pass over every actor.
    pub async fn view(&self) -> Result<SessionView, SessionError> {
        Ok(SessionView {
            backpack: self.backpack.summary(self.backpack_id).await?,
            stats: self.stats.snapshot(self.stats_id).await?,
            census: self.pool.census(self.pool_id).await?,
            notice: self.backpack.current_notice(self.backpack_id).await?,
            last_collection: self.backpack.last_collection(self.backpack_id).await?,
        })
    }

    /// Retunes the rare chance for later activations.
    pub async fn set_rare_chance(&mut self, chance: f64) -> Result<(), SessionError> {
        self.pool.set_rare_chance(self.pool_id, chance).await?;
        self.config.pool.rare_chance = chance;
        Ok(())
    }

    /// Retunes the backpack's notice duration or valuable threshold.
    ///
    /// A new duration applies to notices posted afterwards.
    pub async fn retune_backpack(&mut self, update: BackpackUpdate) -> Result<(), SessionError> {
        self.backpack.retune(self.backpack_id, update.clone()).await?;
        if let Some(millis) = update.notice_duration_ms {
            self.config.backpack.notice_duration_ms = millis;
        }
        if let Some(threshold) = update.high_value_threshold {
            self.config.backpack.high_value_threshold = threshold;
        }
        Ok(())
    }

    /// Starts a staggered batch, cancelling any batch still running.
    pub fn spawn_batch(&mut self, count: usize, interval: Duration) {
        self.cancel_spawning();
        self.spawner = Some(spawn_batch(self.pool.clone(), self.pool_id, count, interval));
    }

    pub fn cancel_spawning(&mut self) {
        if let Some(spawner) = self.spawner.as_mut() {
            spawner.cancel();
        }
    }

    /// Waits for the current batch, if any, and returns how many gems it activated.
    pub async fn wait_for_spawning(&mut self) -> Result<usize, SessionError> {
        match self.spawner.take() {
            Some(spawner) => Ok(spawner.finish().await?),
            None => Ok(0),
        }
    }

    /// Gracefully shuts down the whole session.
    ///
    /// Cancels spawning, deletes the session's entities, drops every client
    /// and waits for each actor task to end.
    pub async fn shutdown(mut self) -> Result<(), SessionError> {
        info!("Shutting down session...");
        self.cancel_spawning();
        let spawned = self.wait_for_spawning().await?;

        if let Err(e) = self.backpack.delete(self.backpack_id).await {
            warn!(error = %e, "Backpack not deleted");
        }
        if let Err(e) = self.pool.delete(self.pool_id).await {
            warn!(error = %e, "Pool not deleted");
        }
        if let Err(e) = self.stats.delete(self.stats_id).await {
            warn!(error = %e, "Stats not deleted");
        }

        // The backpack actor holds clones of the pool and stats clients in its
        // context; they are released once its own channel closes.
        drop(self.backpack);
        drop(self.pool);
        drop(self.stats);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }

        info!(spawned, "Session shutdown complete.");
        Ok(())
    }
}
