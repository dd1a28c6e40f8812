//! Generic actor framework for the session resources.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - trait the pool, backpack and statistics implement
//! - [`ResourceActor`] - owns the resources of one type and serializes access to them
//! - [`ResourceClient`] - cloneable, type-safe handle for sending requests
//! - [`FrameworkError`] - plumbing failures (actor closed, not found, ...)
//!
//! # Testing
//!
//! See [`mock`] for scripted clients that stand in for a running actor.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
