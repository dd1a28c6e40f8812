//! # Gem Session
//!
//! > **Pooled collectibles, a weight-limited backpack and running session totals.**
//!
//! Gems are drawn from a reusable pool into the scene, collected into a
//! backpack that must never exceed its weight ceiling, and deposited. Every
//! step is counted by a statistics tracker that keeps running aggregates
//! instead of recomputing them from history.
//!
//! ## Lifecycle of a gem
//!
//! ```text
//! Pooled --activate--> Active --collect--> Held --deposit--> Deposited
//!    ^                   |
//!    +----deactivate-----+
//! ```
//!
//! `Deposited` is terminal. A gem is always in exactly one place (a pool
//! slot, the held set, or the deposited record) and moves between them by
//! value.
//!
//! ## Architecture Notes
//!
//! ### 1. One actor per resource
//! The pool, the backpack and the statistics tracker each live inside a
//! generic [`ResourceActor`](framework::ResourceActor) that processes its
//! mailbox one request at a time. That loop is the only critical section:
//! no locks guard the session state.
//!
//! ### 2. Atomic collection
//! A collection is a single backpack request. The backpack asks the pool to
//! *claim* the gem against its remaining capacity; the pool checks and removes
//! in one step, so concurrent collection events can never overfill the
//! backpack or hand the same gem out twice.
//!
//! ### 3. Context injection
//! The backpack's collaborators (pool and statistics clients) are passed to
//! `run()`, not looked up globally.
//!
//! ### 4. Type-safe errors
//! Each actor has its own `thiserror` enum ([`PoolError`](pool_actor::PoolError),
//! [`BackpackError`](backpack_actor::BackpackError),
//! [`StatsError`](stats_actor::StatsError)); the typed clients unwrap them
//! from the framework's [`FrameworkError`](framework::FrameworkError).
//!
//! ## Module Tour
//!
//! - [`framework`] - the generic actor engine and its mock clients
//! - [`model`] - gems, pool, backpack, statistics, scene reports, notices
//! - [`pool_actor`], [`backpack_actor`], [`stats_actor`] - the three actors
//! - [`clients`] - typed wrappers around the generic client
//! - [`lifecycle`] - [`GemSession`](lifecycle::GemSession), batch spawning, tracing setup
//! - [`config`] - TOML session configuration
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=debug cargo run -- path/to/session.toml
//! ```

pub mod backpack_actor;
pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod pool_actor;
pub mod stats_actor;
