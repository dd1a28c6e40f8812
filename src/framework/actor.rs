//! # Generic Actor Server
//!
//! [`ResourceActor`] owns the resources of one type and drains their mailbox one
//! request at a time. That sequential loop is the critical section of the
//! session: a backpack's capacity check and the insert it guards, or a pool's
//! first-fit scan and the activation that follows, can never interleave with
//! another request to the same actor.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::{ResourceRequest, Response};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of session resources.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor (server) and a client.
/// 2.  **Wire**: pass collaborators into `actor.run(context)`.
/// 3.  **Run**: spawn the loop on a Tokio task.
///
/// ```rust,ignore
/// let (stats_actor, stats) = ResourceActor::<SessionStats>::new(32);
/// let (pool_actor, pool) = ResourceActor::<GemPool>::new(32);
/// let (backpack_actor, backpack) = ResourceActor::<Backpack>::new(32);
///
/// tokio::spawn(stats_actor.run(()));
/// tokio::spawn(pool_actor.run(()));
/// tokio::spawn(backpack_actor.run((PoolClient::new(pool), StatsClient::new(stats))));
/// ```
///
/// # Operations
///
/// * **Create**: next id from the `u32` counter, `from_create_params`, `on_create`, store.
/// * **Get**: clone of the stored resource, or `None`.
/// * **Update**: `on_update` in place, returns the updated clone.
/// * **Delete**: `on_delete`, then remove.
/// * **Action**: `handle_action` in place, returns its result.
///
/// Hook errors are logged and returned to the caller wrapped in
/// [`FrameworkError::EntityError`]; they never stop the loop.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` bounds the mailbox; senders wait while it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the event loop until every client has been dropped.
    ///
    /// `context` is passed to every hook; it is how the backpack reaches the pool
    /// and the statistics actor without any global lookup.
    pub async fn run(mut self, context: T::Context) {
        // "GemPool" instead of "gem_session::model::pool::GemPool"
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        let mut handled: u64 = 0;
        while let Some(msg) = self.receiver.recv().await {
            handled += 1;
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            reply(respond_to, Err(FrameworkError::entity(e)));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, %id, error = %e, "on_create failed");
                        reply(respond_to, Err(FrameworkError::entity(e)));
                        continue;
                    }
                    self.store.insert(id.clone(), item);
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    reply(respond_to, Ok(id));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    reply(respond_to, Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        reply(respond_to, Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    match item.on_update(update, &context).await {
                        Ok(()) => {
                            info!(entity_type, %id, "Updated");
                            reply(respond_to, Ok(item.clone()));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            reply(respond_to, Err(FrameworkError::entity(e)));
                        }
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        reply(respond_to, Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        reply(respond_to, Err(FrameworkError::entity(e)));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    reply(respond_to, Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        reply(respond_to, Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(FrameworkError::entity);
                    match &result {
                        Ok(_) => debug!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    reply(respond_to, result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), handled, "Shutdown");
    }
}

// The caller may have given up waiting; a closed reply channel is not an error.
fn reply<R>(respond_to: Response<R>, result: Result<R, FrameworkError>) {
    let _ = respond_to.send(result);
}
