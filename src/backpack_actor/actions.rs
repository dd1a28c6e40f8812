//! Custom actions for the backpack actor.
//!
//! [`BackpackAction::TryCollect`] is the one action that reaches other actors:
//! it claims the gem from the pool, registers it with the statistics tracker
//! and asks the pool for a replacement, all before the next backpack request
//! is looked at.

use crate::model::{BackpackSummary, CollectOutcome, CollectionRecord, Gem, GemId, Notice};

/// Custom actions for backpack entities.
#[derive(Debug, Clone)]
pub enum BackpackAction {
    /// The player came within reach of an active gem.
    TryCollect(GemId),
    DepositAll,
    /// Deposits the `k` most valuable held gems.
    DepositTopValuable(usize),
    Summary,
    HeldByValue,
    CurrentNotice,
    LastCollection,
}

/// Results from BackpackActions - variants match 1:1 with BackpackAction
#[derive(Debug, Clone)]
pub enum BackpackActionResult {
    TryCollect(CollectOutcome),
    /// Number of gems moved.
    DepositAll(usize),
    /// The moved gems, most valuable first.
    DepositTopValuable(Vec<Gem>),
    Summary(BackpackSummary),
    HeldByValue(Vec<Gem>),
    CurrentNotice(Option<Notice>),
    LastCollection(Option<CollectionRecord>),
}
