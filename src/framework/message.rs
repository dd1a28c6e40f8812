//! # Generic Messages
//!
//! Requests travelling from a [`ResourceClient`](crate::framework::ResourceClient)
//! to its [`ResourceActor`](crate::framework::ResourceActor), each carrying the
//! oneshot sender the actor answers on.

use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use tokio::sync::oneshot;

/// One-shot reply channel used by every request.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A request to a `ResourceActor<T>`.
///
/// The lifecycle variants (`Create`, `Get`, `Update`, `Delete`) are shared by
/// every session resource; anything domain specific goes through `Action`
/// with the resource's own [`ActorEntity::Action`] enum.
///
/// - **Create**: start of a resource's life, from [`ActorEntity::Create`].
/// - **Get**: a cloned snapshot for read-only display passes.
/// - **Update**: in-place tuning from [`ActorEntity::Update`].
/// - **Delete**: end of the session for that resource.
/// - **Action**: a resource-specific [`ActorEntity::Action`].
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
