//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the `tracing-subscriber` formatter for the
//! demo binary. Library code only emits events; it never installs a
//! subscriber itself.
//!
//! ## Levels
//!
//! - `info`: actor start and shutdown, pool growth, collections, deposits, batch progress
//! - `debug`: every request with its payload, notices, spawn records
//! - `warn`: rejected requests, soft-validation failures, follow-ups that failed after a collection
//! - `error`: a pool created without a common template
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Full payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the backpack's decisions
//! RUST_LOG=gem_session::backpack_actor=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a collection reads:
//!
//! ```text
//! INFO try_collect: Gem collected backpack_id=backpack_1 gem_id=gem_4 kind=Blue value=23 held_weight=7.3
//! INFO spawn_batch: Batch complete activated=10
//! ```
//!
//! Actor lines carry an `entity_type` field (`GemPool`, `Backpack`,
//! `SessionStats`) instead of a module path.

/// Installs a compact formatter filtered by `RUST_LOG`. Call once per process.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
