//! [`ActorEntity`] implementation for [`GemPool`].
//!
//! The pool has no collaborators (`Context = ()`). Every handler runs inside
//! the pool actor's loop, so a claim's capacity check and the removal of the
//! gem happen without any other request in between.

use super::actions::{PoolAction, PoolActionResult};
use super::error::PoolError;
use crate::framework::ActorEntity;
use crate::model::{GemPool, PoolCreate, PoolId, PoolUpdate, SceneReport};
use async_trait::async_trait;
use tracing::info;

#[async_trait]
impl ActorEntity for GemPool {
    type Id = PoolId;
    type Create = PoolCreate;
    type Update = PoolUpdate;
    type Action = PoolAction;
    type ActionResult = PoolActionResult;
    type Context = ();
    type Error = PoolError;

    /// Builds the pool and its initial slots. A missing common template is
    /// not an error here; the pool comes up disabled.
    fn from_create_params(id: PoolId, params: PoolCreate) -> Result<Self, PoolError> {
        check_rare_chance(params.config.rare_chance)?;
        params
            .config
            .validate()
            .map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        Ok(GemPool::new(id, params.config))
    }

    async fn on_create(&mut self, _ctx: &()) -> Result<(), PoolError> {
        let census = self.census();
        info!(pool_id = %self.id, slots = census.slots, status = ?self.status(), "Pool ready");
        Ok(())
    }

    /// # Fields Updated
    /// - `rare_chance`: must lie in `[0, 1]`
    async fn on_update(&mut self, update: PoolUpdate, _ctx: &()) -> Result<(), PoolError> {
        if let Some(chance) = update.rare_chance {
            check_rare_chance(chance)?;
            self.set_rare_chance(chance);
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: PoolAction,
        _ctx: &(),
    ) -> Result<PoolActionResult, PoolError> {
        let result = match action {
            PoolAction::ActivateOne => PoolActionResult::ActivateOne(self.activate_one()),
            PoolAction::Claim { gem_id, capacity } => {
                PoolActionResult::Claim(self.claim(gem_id, capacity))
            }
            PoolAction::Deactivate(gem_id) => PoolActionResult::Deactivate(self.deactivate(gem_id)),
            PoolAction::ActiveGems => {
                PoolActionResult::ActiveGems(self.active_gems().cloned().collect())
            }
            PoolAction::Census => PoolActionResult::Census(self.census()),
            PoolAction::SpawnHistory => {
                PoolActionResult::SpawnHistory(self.spawn_history().to_vec())
            }
            PoolAction::Analyze { observer, scene } => PoolActionResult::Analyze(
                SceneReport::analyze(self.active_gems(), observer, &scene),
            ),
        };
        Ok(result)
    }
}

fn check_rare_chance(chance: f64) -> Result<(), PoolError> {
    if (0.0..=1.0).contains(&chance) {
        Ok(())
    } else {
        Err(PoolError::InvalidRareChance(chance))
    }
}
