//! [`ActorEntity`] implementation for [`SessionStats`].
//!
//! Statistics only ever grow through actions; there is nothing to update.

use super::actions::{StatsAction, StatsActionResult};
use super::error::StatsError;
use crate::framework::ActorEntity;
use crate::model::{SessionStats, StatsCreate, StatsId};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
impl ActorEntity for SessionStats {
    type Id = StatsId;
    type Create = StatsCreate;
    type Update = ();
    type Action = StatsAction;
    type ActionResult = StatsActionResult;
    type Context = ();
    type Error = StatsError;

    fn from_create_params(id: StatsId, _params: StatsCreate) -> Result<Self, StatsError> {
        Ok(SessionStats::new(id))
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), StatsError> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: StatsAction,
        _ctx: &(),
    ) -> Result<StatsActionResult, StatsError> {
        match action {
            StatsAction::RegisterCollected(gem) => {
                self.register_collected(&gem);
                debug!(
                    stats_id = %self.id,
                    total = self.total_collected(),
                    average = self.average_collected_value(),
                    "Collection registered"
                );
                Ok(StatsActionResult::RegisterCollected(self.total_collected()))
            }
            StatsAction::RegisterDeposited(gems) => {
                self.register_deposited(&gems);
                debug!(stats_id = %self.id, batch = gems.len(), total = self.total_deposited(), "Deposit registered");
                Ok(StatsActionResult::RegisterDeposited(self.total_deposited()))
            }
        }
    }
}
