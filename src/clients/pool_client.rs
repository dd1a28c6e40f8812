//! # Pool Client
//!
//! Provides a high-level API for interacting with the [`GemPool`] actor.
//! It wraps a `ResourceClient<GemPool>` and exposes domain-specific methods.
use crate::clients::actor_client::{entity_error, ActorClient};
use crate::config::{PoolConfig, SceneConfig};
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{
    Capacity, ClaimOutcome, Gem, GemId, GemPool, PoolCensus, PoolCreate, PoolId, PoolUpdate,
    Position, SceneReport, SpawnRecord,
};
use crate::pool_actor::{PoolAction, PoolActionResult, PoolError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the pool actor.
#[derive(Clone)]
pub struct PoolClient {
    inner: ResourceClient<GemPool>,
}

impl PoolClient {
    pub fn new(inner: ResourceClient<GemPool>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<GemPool> for PoolClient {
    type Error = PoolError;

    fn inner(&self) -> &ResourceClient<GemPool> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match entity_error::<PoolError>(e) {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => PoolError::NotFound(id),
            Err(other) => PoolError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl PoolClient {
    #[instrument(skip(self, config))]
    pub async fn create_pool(&self, config: PoolConfig) -> Result<PoolId, PoolError> {
        debug!(?config, "create_pool called");
        self.inner
            .create(PoolCreate { config })
            .await
            .map_err(Self::map_error)
    }

    /// Draws one gem into the scene. `None` when the pool is disabled.
    #[instrument(skip(self))]
    pub async fn activate_one(&self, id: PoolId) -> Result<Option<Gem>, PoolError> {
        match self.action(id, PoolAction::ActivateOne).await? {
            PoolActionResult::ActivateOne(gem) => Ok(gem),
            _ => unreachable!("ActivateOne action must return ActivateOne result"),
        }
    }

    /// Takes `gem_id` out of the pool if `capacity` admits its weight.
    #[instrument(skip(self))]
    pub async fn claim(
        &self,
        id: PoolId,
        gem_id: GemId,
        capacity: Capacity,
    ) -> Result<ClaimOutcome, PoolError> {
        match self.action(id, PoolAction::Claim { gem_id, capacity }).await? {
            PoolActionResult::Claim(outcome) => Ok(outcome),
            _ => unreachable!("Claim action must return Claim result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: PoolId, gem_id: GemId) -> Result<bool, PoolError> {
        match self.action(id, PoolAction::Deactivate(gem_id)).await? {
            PoolActionResult::Deactivate(done) => Ok(done),
            _ => unreachable!("Deactivate action must return Deactivate result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn active_gems(&self, id: PoolId) -> Result<Vec<Gem>, PoolError> {
        match self.action(id, PoolAction::ActiveGems).await? {
            PoolActionResult::ActiveGems(gems) => Ok(gems),
            _ => unreachable!("ActiveGems action must return ActiveGems result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn census(&self, id: PoolId) -> Result<PoolCensus, PoolError> {
        match self.action(id, PoolAction::Census).await? {
            PoolActionResult::Census(census) => Ok(census),
            _ => unreachable!("Census action must return Census result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn spawn_history(&self, id: PoolId) -> Result<Vec<SpawnRecord>, PoolError> {
        match self.action(id, PoolAction::SpawnHistory).await? {
            PoolActionResult::SpawnHistory(history) => Ok(history),
            _ => unreachable!("SpawnHistory action must return SpawnHistory result"),
        }
    }

    #[instrument(skip(self, scene))]
    pub async fn analyze(
        &self,
        id: PoolId,
        observer: Option<Position>,
        scene: SceneConfig,
    ) -> Result<SceneReport, PoolError> {
        match self.action(id, PoolAction::Analyze { observer, scene }).await? {
            PoolActionResult::Analyze(report) => Ok(report),
            _ => unreachable!("Analyze action must return Analyze result"),
        }
    }

    /// Retunes the rare chance. Rejected unless it lies in `[0, 1]`.
    #[instrument(skip(self))]
    pub async fn set_rare_chance(&self, id: PoolId, chance: f64) -> Result<(), PoolError> {
        let update = PoolUpdate {
            rare_chance: Some(chance),
        };
        self.inner
            .update(id, update)
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    async fn action(&self, id: PoolId, action: PoolAction) -> Result<PoolActionResult, PoolError> {
        debug!(?action, "Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}
