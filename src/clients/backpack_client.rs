//! # Backpack Client
//!
//! Provides a high-level API for interacting with the [`Backpack`] actor.
use crate::clients::actor_client::{entity_error, ActorClient};
use crate::config::BackpackConfig;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{
    Backpack, BackpackCreate, BackpackId, BackpackSummary, BackpackUpdate, CollectOutcome,
    CollectionRecord, Gem, GemId, Notice, PoolId, StatsId,
};
use crate::backpack_actor::{BackpackAction, BackpackActionResult, BackpackError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the backpack actor.
#[derive(Clone)]
pub struct BackpackClient {
    inner: ResourceClient<Backpack>,
}

impl BackpackClient {
    pub fn new(inner: ResourceClient<Backpack>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Backpack> for BackpackClient {
    type Error = BackpackError;

    fn inner(&self) -> &ResourceClient<Backpack> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match entity_error::<BackpackError>(e) {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => BackpackError::NotFound(id),
            Err(other) => BackpackError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl BackpackClient {
    /// Creates a backpack bound to `pool_id` and `stats_id`.
    #[instrument(skip(self, config))]
    pub async fn create_backpack(
        &self,
        pool_id: PoolId,
        stats_id: StatsId,
        config: BackpackConfig,
    ) -> Result<BackpackId, BackpackError> {
        debug!(?config, "create_backpack called");
        let params = BackpackCreate {
            pool_id,
            stats_id,
            config,
        };
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn try_collect(
        &self,
        id: BackpackId,
        gem_id: GemId,
    ) -> Result<CollectOutcome, BackpackError> {
        match self.action(id, BackpackAction::TryCollect(gem_id)).await? {
            BackpackActionResult::TryCollect(outcome) => Ok(outcome),
            _ => unreachable!("TryCollect action must return TryCollect result"),
        }
    }

    /// Returns how many gems were deposited.
    #[instrument(skip(self))]
    pub async fn deposit_all(&self, id: BackpackId) -> Result<usize, BackpackError> {
        match self.action(id, BackpackAction::DepositAll).await? {
            BackpackActionResult::DepositAll(count) => Ok(count),
            _ => unreachable!("DepositAll action must return DepositAll result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn deposit_top_valuable(
        &self,
        id: BackpackId,
        k: usize,
    ) -> Result<Vec<Gem>, BackpackError> {
        match self.action(id, BackpackAction::DepositTopValuable(k)).await? {
            BackpackActionResult::DepositTopValuable(gems) => Ok(gems),
            _ => unreachable!("DepositTopValuable action must return DepositTopValuable result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn summary(&self, id: BackpackId) -> Result<BackpackSummary, BackpackError> {
        match self.action(id, BackpackAction::Summary).await? {
            BackpackActionResult::Summary(summary) => Ok(summary),
            _ => unreachable!("Summary action must return Summary result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn held_by_value(&self, id: BackpackId) -> Result<Vec<Gem>, BackpackError> {
        match self.action(id, BackpackAction::HeldByValue).await? {
            BackpackActionResult::HeldByValue(gems) => Ok(gems),
            _ => unreachable!("HeldByValue action must return HeldByValue result"),
        }
    }

    /// The notice still visible right now, if any.
    #[instrument(skip(self))]
    pub async fn current_notice(&self, id: BackpackId) -> Result<Option<Notice>, BackpackError> {
        match self.action(id, BackpackAction::CurrentNotice).await? {
            BackpackActionResult::CurrentNotice(notice) => Ok(notice),
            _ => unreachable!("CurrentNotice action must return CurrentNotice result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn last_collection(
        &self,
        id: BackpackId,
    ) -> Result<Option<CollectionRecord>, BackpackError> {
        match self.action(id, BackpackAction::LastCollection).await? {
            BackpackActionResult::LastCollection(record) => Ok(record),
            _ => unreachable!("LastCollection action must return LastCollection result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn retune(
        &self,
        id: BackpackId,
        update: BackpackUpdate,
    ) -> Result<Backpack, BackpackError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    async fn action(
        &self,
        id: BackpackId,
        action: BackpackAction,
    ) -> Result<BackpackActionResult, BackpackError> {
        debug!(?action, "Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}
