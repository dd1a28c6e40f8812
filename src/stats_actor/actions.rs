//! Custom actions for the statistics actor.

use crate::model::GemDigest;

#[derive(Debug, Clone)]
pub enum StatsAction {
    /// One accepted collection.
    RegisterCollected(GemDigest),
    /// One deposit batch, possibly empty.
    RegisterDeposited(Vec<GemDigest>),
}

/// Results from StatsActions - variants match 1:1 with StatsAction
#[derive(Debug, Clone)]
pub enum StatsActionResult {
    /// Total collected after registration.
    RegisterCollected(u64),
    /// Total deposited after registration.
    RegisterDeposited(u64),
}
