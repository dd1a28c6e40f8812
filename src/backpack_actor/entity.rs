//! [`ActorEntity`] implementation for [`Backpack`].
//!
//! The backpack depends on the pool and the statistics tracker. Both clients
//! arrive through the context injected at `run()`, together with the ids of
//! the entities this backpack was created against.

use super::actions::{BackpackAction, BackpackActionResult};
use super::error::BackpackError;
use crate::clients::{PoolClient, StatsClient};
use crate::framework::ActorEntity;
use crate::model::{
    Backpack, BackpackCreate, BackpackId, BackpackUpdate, ClaimOutcome, CollectOutcome, GemId,
};
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

#[async_trait]
impl ActorEntity for Backpack {
    type Id = BackpackId;
    type Create = BackpackCreate;
    type Update = BackpackUpdate;
    type Action = BackpackAction;
    type ActionResult = BackpackActionResult;
    type Context = (PoolClient, StatsClient);
    type Error = BackpackError;

    fn from_create_params(id: BackpackId, params: BackpackCreate) -> Result<Self, BackpackError> {
        let ceiling = params.config.weight_ceiling;
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(BackpackError::InvalidCeiling(ceiling));
        }
        Ok(Backpack::new(id, params))
    }

    /// # Fields Updated
    /// - `notice_duration_ms`: how long later notices stay visible
    /// - `high_value_threshold`: used by the summary's valuable count
    async fn on_update(
        &mut self,
        update: BackpackUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), BackpackError> {
        self.apply(update);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: BackpackAction,
        ctx: &Self::Context,
    ) -> Result<BackpackActionResult, BackpackError> {
        let (pool, stats) = ctx;
        match action {
            BackpackAction::TryCollect(gem_id) => {
                let outcome = self.try_collect(gem_id, pool, stats).await?;
                Ok(BackpackActionResult::TryCollect(outcome))
            }
            BackpackAction::DepositAll => {
                let digests = self.deposit_all();
                let count = digests.len();
                if count > 0 {
                    if let Err(e) = stats.register_deposited(self.stats_id, digests).await {
                        warn!(backpack_id = %self.id, error = %e, "Deposit not registered");
                    }
                }
                Ok(BackpackActionResult::DepositAll(count))
            }
            BackpackAction::DepositTopValuable(k) => {
                let moved = self.deposit_top_valuable(k);
                if !moved.is_empty() {
                    let digests = moved.iter().map(|gem| gem.digest()).collect();
                    if let Err(e) = stats.register_deposited(self.stats_id, digests).await {
                        warn!(backpack_id = %self.id, error = %e, "Deposit not registered");
                    }
                }
                Ok(BackpackActionResult::DepositTopValuable(moved))
            }
            BackpackAction::Summary => Ok(BackpackActionResult::Summary(self.summary())),
            BackpackAction::HeldByValue => Ok(BackpackActionResult::HeldByValue(
                self.held_by_value().into_iter().cloned().collect(),
            )),
            BackpackAction::CurrentNotice => Ok(BackpackActionResult::CurrentNotice(
                self.current_notice(Instant::now()).cloned(),
            )),
            BackpackAction::LastCollection => {
                Ok(BackpackActionResult::LastCollection(self.last_collection()))
            }
        }
    }
}

impl Backpack {
    /// Claims `gem_id` from the pool against this backpack's remaining room.
    ///
    /// An accepted gem is registered with the statistics tracker and the pool
    /// is asked to backfill. Once the claim succeeded the collection stands:
    /// failures of those two follow-ups are logged, not returned.
    #[instrument(skip(self, pool, stats), fields(backpack_id = %self.id))]
    async fn try_collect(
        &mut self,
        gem_id: GemId,
        pool: &PoolClient,
        stats: &StatsClient,
    ) -> Result<CollectOutcome, BackpackError> {
        match pool.claim(self.pool_id, gem_id, self.capacity()).await? {
            ClaimOutcome::Claimed(gem) => {
                let digest = gem.digest();
                let record = self.stow(gem);
                if let Err(e) = stats.register_collected(self.stats_id, digest).await {
                    warn!(error = %e, "Collection not registered");
                }
                if let Err(e) = pool.activate_one(self.pool_id).await {
                    warn!(error = %e, "Backfill failed");
                }
                Ok(CollectOutcome::Accepted(record))
            }
            ClaimOutcome::TooHeavy { weight } => Ok(self.reject(weight)),
            ClaimOutcome::Unavailable => {
                debug!(%gem_id, "Gem no longer active");
                Ok(CollectOutcome::Unavailable)
            }
        }
    }
}
