//! # Session Lifecycle & Orchestration
//!
//! Individual actors are simple; wiring them together is where the
//! complexity lives. This module starts the session's actors, injects their
//! dependencies, runs the staggered spawning and shuts everything down again.
//!
//! ## The GemSession Pattern
//!
//! ```rust,ignore
//! // 1. Create actors (no dependencies yet)
//! let (stats_actor, stats) = stats_actor::new();
//! let (pool_actor, pool) = pool_actor::new();
//! let (backpack_actor, backpack) = backpack_actor::new();
//!
//! // 2. Start actors with their dependencies injected
//! tokio::spawn(stats_actor.run(()));
//! tokio::spawn(pool_actor.run(()));
//! tokio::spawn(backpack_actor.run((pool.clone(), stats.clone())));
//! ```
//!
//! ## Dependency Injection via Context
//!
//! Actors are created without dependencies and receive them in
//! `run(context)`. The backpack declares
//! `type Context = (PoolClient, StatsClient)`; the pool and the statistics
//! tracker need nothing.
//!
//! ## Graceful Shutdown
//!
//! 1. **Cancel spawning** - the batch task stops before its next activation
//! 2. **Delete entities** - each actor runs its `on_delete` hook
//! 3. **Drop all clients** - closes the sender side of the channels
//! 4. **Await completion** - every actor drains its mailbox and exits
//!
//! The dependency graph is acyclic (backpack → pool, backpack → stats), so
//! channel closure alone is enough to stop every actor.
//!
//! ## Observability
//!
//! See [`setup_tracing`](self::tracing::setup_tracing).

pub mod gem_session;
pub mod spawner;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use gem_session::*;
pub use spawner::*;
