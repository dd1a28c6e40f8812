//! # Pool Actor
//!
//! Owns the [`GemPool`] and serializes every activation, claim and query on it.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`GemPool`]
//! - [`error`] - [`PoolError`]
//! - [`actions`] - [`PoolAction`] and [`PoolActionResult`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust,ignore
//! let (actor, generic_client) = pool_actor::new();
//! let pool = PoolClient::new(generic_client);
//! tokio::spawn(actor.run(()));
//!
//! let pool_id = pool.create_pool(config.pool.clone()).await?;
//! let gem = pool.activate_one(pool_id).await?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::GemPool;

/// Creates a new pool actor and its client.
pub fn new() -> (ResourceActor<GemPool>, ResourceClient<GemPool>) {
    ResourceActor::new(32)
}
