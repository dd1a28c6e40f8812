//! # ActorEntity Trait
//!
//! The contract every session resource (the gem pool, the backpack, the session
//! statistics) implements so that a generic [`ResourceActor`](crate::framework::ResourceActor)
//! can own it and serialize access to it.
//!
//! Associated types pin down the payloads per resource: a `GemPool` is created
//! from a `PoolCreate`, a `Backpack` from a `BackpackCreate`, and the compiler
//! refuses to route one into the other.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! Both default to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any session resource must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// Hooks are `#[async_trait]` because some resources talk to other actors while
/// handling a request (the backpack claims gems from the pool and reports to the
/// statistics actor). Those collaborators arrive through `Context`, which is
/// handed to `run()` rather than `new()`, so actors can be created before they
/// are wired together.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier of one resource instance. Generated by the actor from a `u32` counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload used to create a new instance.
    type Create: Send + Sync + Debug;

    /// Payload used to retune an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations (e.g. `ActivateOne`, `TryCollect`).
    type Action: Send + Sync + Debug;

    /// Result of a custom action. Variants usually mirror `Action` one to one.
    type ActionResult: Send + Sync + Debug;

    /// Collaborators injected into the actor. `()` when there are none.
    type Context: Send + Sync;

    /// One error enum per resource, shared by every hook.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds the resource from its id and creation payload.
    /// Runs synchronously, before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Runs right after construction, before the resource is stored.
    /// Returning an error discards the new instance.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update request in place.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Runs right before the resource is removed. An error keeps it stored.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handles a resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
