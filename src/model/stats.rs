/// Running totals for one play session.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for SessionStats`](#impl-ActorEntity-for-SessionStats) for details on:
/// - Custom actions ([`StatsAction`](crate::stats_actor::StatsAction))
use crate::model::gem::{GemDigest, GemKind};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for statistics trackers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatsId(pub u32);

impl From<u32> for StatsId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for StatsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stats_{}", self.0)
    }
}

/// Payload for creating a statistics tracker. Every counter starts at zero.
#[derive(Debug, Clone, Default)]
pub struct StatsCreate;

/// Occurrences per kind, in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    entries: Vec<(GemKind, u64)>,
}

impl FrequencyTable {
    pub fn record(&mut self, kind: GemKind) {
        match self.entries.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((kind, 1)),
        }
    }

    pub fn count(&self, kind: GemKind) -> u64 {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, count)| *count)
    }

    /// The highest count; on a tie, the kind seen first. `None` when empty.
    pub fn most_frequent(&self) -> Option<GemKind> {
        let mut best: Option<(GemKind, u64)> = None;
        for &(kind, count) in &self.entries {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((kind, count));
            }
        }
        best.map(|(kind, _)| kind)
    }

    pub fn entries(&self) -> &[(GemKind, u64)] {
        &self.entries
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub id: StatsId,
    total_collected: u64,
    total_deposited: u64,
    collected_value: i64,
    collected_weight: f64,
    max_collected_weight: f32,
    collected_kinds: FrequencyTable,
    deposited_kinds: FrequencyTable,
}

impl SessionStats {
    pub fn new(id: StatsId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn register_collected(&mut self, gem: &GemDigest) {
        self.total_collected += 1;
        self.collected_value += i64::from(gem.value);
        self.collected_weight += f64::from(gem.weight);
        self.max_collected_weight = self.max_collected_weight.max(gem.weight);
        self.collected_kinds.record(gem.kind);
    }

    pub fn register_deposited(&mut self, gems: &[GemDigest]) {
        self.total_deposited += gems.len() as u64;
        for gem in gems {
            self.deposited_kinds.record(gem.kind);
        }
    }

    pub fn total_collected(&self) -> u64 {
        self.total_collected
    }

    pub fn total_deposited(&self) -> u64 {
        self.total_deposited
    }

    pub fn collected_value(&self) -> i64 {
        self.collected_value
    }

    pub fn collected_weight(&self) -> f64 {
        self.collected_weight
    }

    pub fn max_collected_weight(&self) -> f32 {
        self.max_collected_weight
    }

    /// Zero before the first collection.
    pub fn average_collected_value(&self) -> f64 {
        if self.total_collected == 0 {
            0.0
        } else {
            self.collected_value as f64 / self.total_collected as f64
        }
    }

    pub fn most_frequent_collected_kind(&self) -> Option<GemKind> {
        self.collected_kinds.most_frequent()
    }

    pub fn most_frequent_deposited_kind(&self) -> Option<GemKind> {
        self.deposited_kinds.most_frequent()
    }

    pub fn collected_kinds(&self) -> &FrequencyTable {
        &self.collected_kinds
    }

    pub fn deposited_kinds(&self) -> &FrequencyTable {
        &self.deposited_kinds
    }
}
