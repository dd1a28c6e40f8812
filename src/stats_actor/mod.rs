//! # Stats Actor
//!
//! Keeps the running session totals. Registrations arrive from the backpack
//! actor; display layers read a snapshot with `get`.
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`SessionStats`]
//! - [`error`] - [`StatsError`]
//! - [`actions`] - [`StatsAction`] and [`StatsActionResult`]

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::SessionStats;

/// Creates a new statistics actor and its client.
pub fn new() -> (ResourceActor<SessionStats>, ResourceClient<SessionStats>) {
    ResourceActor::new(32)
}
