//! # Stats Client
//!
//! Typed access to the [`SessionStats`] actor.
use crate::clients::actor_client::{entity_error, ActorClient};
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{GemDigest, SessionStats, StatsCreate, StatsId};
use crate::stats_actor::{StatsAction, StatsActionResult, StatsError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the statistics actor.
#[derive(Clone)]
pub struct StatsClient {
    inner: ResourceClient<SessionStats>,
}

impl StatsClient {
    pub fn new(inner: ResourceClient<SessionStats>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<SessionStats> for StatsClient {
    type Error = StatsError;

    fn inner(&self) -> &ResourceClient<SessionStats> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match entity_error::<StatsError>(e) {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => StatsError::NotFound(id),
            Err(other) => StatsError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl StatsClient {
    #[instrument(skip(self))]
    pub async fn create_stats(&self) -> Result<StatsId, StatsError> {
        self.inner
            .create(StatsCreate)
            .await
            .map_err(Self::map_error)
    }

    /// Returns the total collected after this registration.
    #[instrument(skip(self))]
    pub async fn register_collected(&self, id: StatsId, gem: GemDigest) -> Result<u64, StatsError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, StatsAction::RegisterCollected(gem))
            .await
        {
            Ok(StatsActionResult::RegisterCollected(total)) => Ok(total),
            Ok(_) => unreachable!("RegisterCollected action must return RegisterCollected result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Returns the total deposited after this registration.
    #[instrument(skip(self, gems), fields(batch = gems.len()))]
    pub async fn register_deposited(
        &self,
        id: StatsId,
        gems: Vec<GemDigest>,
    ) -> Result<u64, StatsError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, StatsAction::RegisterDeposited(gems))
            .await
        {
            Ok(StatsActionResult::RegisterDeposited(total)) => Ok(total),
            Ok(_) => unreachable!("RegisterDeposited action must return RegisterDeposited result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// A copy of the current totals.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, id: StatsId) -> Result<SessionStats, StatsError> {
        self.get(id)
            .await?
            .ok_or_else(|| StatsError::NotFound(id.to_string()))
    }
}
