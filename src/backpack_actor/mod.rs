//! # Backpack Actor
//!
//! Owns the [`Backpack`] and its held and deposited gems.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Backpack`]
//! - [`error`] - [`BackpackError`]
//! - [`actions`] - [`BackpackAction`] and [`BackpackActionResult`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Dependencies
//!
//! The backpack reaches the pool and the statistics tracker through its
//! context, injected when the actor is started:
//!
//! ```rust,ignore
//! let (actor, generic_client) = backpack_actor::new();
//! tokio::spawn(actor.run((pool_client.clone(), stats_client.clone())));
//! ```
//!
//! Because the actor awaits those calls inside the handler, a second
//! `TryCollect` is only looked at once the first one has claimed its gem and
//! updated the held weight. Concurrent collection events can therefore never
//! push the held weight past the ceiling.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Backpack;

/// Creates a new backpack actor and its client.
pub fn new() -> (ResourceActor<Backpack>, ResourceClient<Backpack>) {
    ResourceActor::new(32)
}
