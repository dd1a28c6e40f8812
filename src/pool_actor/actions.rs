//! Custom actions for the pool actor.
//!
//! Everything beyond CRUD that can be done to a [`GemPool`](crate::model::GemPool):
//! drawing gems into the scene, handing them to a backpack, and the read-only
//! queries display layers poll instead of listening for broadcasts.
//!
//! See [`impl ActorEntity for GemPool`](crate::model::GemPool#impl-ActorEntity-for-GemPool)
//! for the handlers.

use crate::config::SceneConfig;
use crate::model::{
    Capacity, ClaimOutcome, Gem, GemId, PoolCensus, Position, SceneReport, SpawnRecord,
};

/// Custom actions for pool entities.
#[derive(Debug, Clone)]
pub enum PoolAction {
    /// Draws one gem into the scene, growing the pool if needed.
    ActivateOne,
    /// Takes an active gem out of the pool if `capacity` admits it.
    Claim { gem_id: GemId, capacity: Capacity },
    /// Returns an active gem to the pool uncollected.
    Deactivate(GemId),
    ActiveGems,
    Census,
    SpawnHistory,
    /// Scene analysis over the active gems.
    Analyze {
        observer: Option<Position>,
        scene: SceneConfig,
    },
}

/// Results from PoolActions - variants match 1:1 with PoolAction
#[derive(Debug, Clone)]
pub enum PoolActionResult {
    /// `None` when the pool is disabled.
    ActivateOne(Option<Gem>),
    Claim(ClaimOutcome),
    /// `false` when the gem was not active.
    Deactivate(bool),
    ActiveGems(Vec<Gem>),
    Census(PoolCensus),
    SpawnHistory(Vec<SpawnRecord>),
    Analyze(SceneReport),
}
