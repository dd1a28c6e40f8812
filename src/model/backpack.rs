/// The player's weight-limited inventory.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for Backpack`](#impl-ActorEntity-for-Backpack) for details on:
/// - Creation parameters ([`BackpackCreate`])
/// - Update parameters ([`BackpackUpdate`])
/// - Custom actions ([`BackpackAction`](crate::backpack_actor::BackpackAction))
use crate::config::BackpackConfig;
use crate::model::gem::{Gem, GemDigest, GemId, GemKind};
use crate::model::notice::{Notice, NoticeKind};
use crate::model::pool::PoolId;
use crate::model::stats::StatsId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Type-safe identifier for backpacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackpackId(pub u32);

impl From<u32> for BackpackId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for BackpackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "backpack_{}", self.0)
    }
}

/// Payload for creating a backpack bound to one pool and one statistics tracker.
#[derive(Debug, Clone)]
pub struct BackpackCreate {
    pub pool_id: PoolId,
    pub stats_id: StatsId,
    pub config: BackpackConfig,
}

#[derive(Debug, Clone, Default)]
pub struct BackpackUpdate {
    pub notice_duration_ms: Option<u64>,
    pub high_value_threshold: Option<i32>,
}

/// Room left in a backpack, as seen by the pool when it hands out a gem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    pub held_weight: f32,
    pub ceiling: f32,
}

impl Capacity {
    /// The one comparison deciding whether a gem fits.
    pub fn admits(&self, weight: f32) -> bool {
        self.held_weight + weight <= self.ceiling
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub gem_id: GemId,
    pub kind: GemKind,
    pub value: i32,
    pub weight: f32,
    /// Time since the backpack was created.
    pub at: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectOutcome {
    Accepted(CollectionRecord),
    /// Nothing changed; a capacity notice was posted.
    OverCapacity {
        gem_weight: f32,
        held_weight: f32,
        ceiling: f32,
    },
    /// The gem is no longer active in the pool.
    Unavailable,
}

impl CollectOutcome {
    pub fn accepted(&self) -> bool {
        matches!(self, CollectOutcome::Accepted(_))
    }
}

/// Per-kind totals over the held set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindTally {
    pub kind: GemKind,
    pub count: usize,
    pub total_value: i64,
    pub total_weight: f32,
}

/// Everything a backpack panel shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackpackSummary {
    pub held_count: usize,
    pub held_weight: f32,
    pub weight_ceiling: f32,
    pub kinds: Vec<KindTally>,
    pub high_value_threshold: i32,
    pub valuable_count: usize,
    pub distinct_kinds: usize,
    pub rare_held: usize,
    pub deposited_count: usize,
    pub deposited_value: i64,
    pub deposited_rare: usize,
}

#[derive(Debug, Clone)]
pub struct Backpack {
    pub id: BackpackId,
    pub pool_id: PoolId,
    pub stats_id: StatsId,
    config: BackpackConfig,
    held: Vec<Gem>,
    deposited: Vec<Gem>,
    last_collection: Option<CollectionRecord>,
    notice: Option<Notice>,
    started_at: Instant,
}

impl Backpack {
    pub fn new(id: BackpackId, params: BackpackCreate) -> Self {
        Self {
            id,
            pool_id: params.pool_id,
            stats_id: params.stats_id,
            config: params.config,
            held: Vec::new(),
            deposited: Vec::new(),
            last_collection: None,
            notice: None,
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &BackpackConfig {
        &self.config
    }

    pub(crate) fn apply(&mut self, update: BackpackUpdate) {
        if let Some(millis) = update.notice_duration_ms {
            self.config.notice_duration_ms = millis;
        }
        if let Some(threshold) = update.high_value_threshold {
            self.config.high_value_threshold = threshold;
        }
    }

    pub fn capacity(&self) -> Capacity {
        Capacity {
            held_weight: self.held_weight(),
            ceiling: self.config.weight_ceiling,
        }
    }

    /// Adds a gem the pool has already released against [`Backpack::capacity`].
    pub(crate) fn stow(&mut self, mut gem: Gem) -> CollectionRecord {
        gem.active = false;
        let record = CollectionRecord {
            gem_id: gem.id,
            kind: gem.kind,
            value: gem.value,
            weight: gem.weight,
            at: self.started_at.elapsed(),
        };
        self.held.push(gem);
        self.last_collection = Some(record);
        info!(
            backpack_id = %self.id,
            gem_id = %record.gem_id,
            kind = %record.kind,
            value = record.value,
            held_weight = self.held_weight(),
            "Gem collected"
        );
        record
    }

    /// Records a refused collection and posts the capacity notice.
    pub(crate) fn reject(&mut self, gem_weight: f32) -> CollectOutcome {
        let held_weight = self.held_weight();
        let ceiling = self.config.weight_ceiling;
        info!(backpack_id = %self.id, gem_weight, held_weight, ceiling, "Backpack full");
        self.post(NoticeKind::CapacityExceeded);
        CollectOutcome::OverCapacity {
            gem_weight,
            held_weight,
            ceiling,
        }
    }

    /// Moves every held gem to the deposited record.
    ///
    /// Returns the digests of the moved gems, in collection order; empty when
    /// nothing was held.
    pub fn deposit_all(&mut self) -> Vec<GemDigest> {
        if self.held.is_empty() {
            self.post(NoticeKind::NothingToDeposit);
            return Vec::new();
        }
        let digests: Vec<GemDigest> = self.held.iter().map(Gem::digest).collect();
        self.deposited.append(&mut self.held);
        info!(backpack_id = %self.id, count = digests.len(), "Deposited all gems");
        self.post(NoticeKind::Deposited);
        digests
    }

    /// Moves the `min(k, held)` most valuable gems to the deposited record.
    ///
    /// Equal values keep collection order. The moved gems are returned from
    /// most to least valuable; the gems left behind keep their relative order.
    pub fn deposit_top_valuable(&mut self, k: usize) -> Vec<Gem> {
        if self.held.is_empty() {
            self.post(NoticeKind::NothingToDeposit);
            return Vec::new();
        }
        if k == 0 {
            return Vec::new();
        }

        let mut order: Vec<usize> = (0..self.held.len()).collect();
        // Stable sort, so earlier collections win ties.
        order.sort_by(|&a, &b| self.held[b].value.cmp(&self.held[a].value));
        order.truncate(k);

        let mut slots: Vec<Option<Gem>> = self.held.drain(..).map(Some).collect();
        let moved: Vec<Gem> = order
            .iter()
            .filter_map(|&index| slots.get_mut(index).and_then(Option::take))
            .collect();
        self.held = slots.into_iter().flatten().collect();
        self.deposited.extend(moved.iter().cloned());

        info!(backpack_id = %self.id, count = moved.len(), remaining = self.held.len(), "Deposited top gems");
        self.post(NoticeKind::Deposited);
        moved
    }

    pub fn held(&self) -> &[Gem] {
        &self.held
    }

    pub fn deposited(&self) -> &[Gem] {
        &self.deposited
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    pub fn held_weight(&self) -> f32 {
        self.held.iter().map(|gem| gem.weight).sum()
    }

    /// Per-kind count, value and weight, in order of first collection.
    pub fn kind_breakdown(&self) -> Vec<KindTally> {
        let mut tallies: Vec<KindTally> = Vec::new();
        for gem in &self.held {
            let tally = match tallies.iter_mut().position(|t| t.kind == gem.kind) {
                Some(index) => &mut tallies[index],
                None => {
                    tallies.push(KindTally {
                        kind: gem.kind,
                        count: 0,
                        total_value: 0,
                        total_weight: 0.0,
                    });
                    let last = tallies.len() - 1;
                    &mut tallies[last]
                }
            };
            tally.count += 1;
            tally.total_value += i64::from(gem.value);
            tally.total_weight += gem.weight;
        }
        tallies
    }

    /// Held gems worth strictly more than `threshold`.
    pub fn count_above(&self, threshold: i32) -> usize {
        self.held.iter().filter(|gem| gem.value > threshold).count()
    }

    pub fn distinct_kinds(&self) -> Vec<GemKind> {
        let mut kinds = Vec::new();
        for gem in &self.held {
            if !kinds.contains(&gem.kind) {
                kinds.push(gem.kind);
            }
        }
        kinds
    }

    pub fn rare_held(&self) -> usize {
        self.held.iter().filter(|gem| gem.kind.is_rare()).count()
    }

    /// Held gems from most to least valuable, ties in collection order.
    pub fn held_by_value(&self) -> Vec<&Gem> {
        let mut gems: Vec<&Gem> = self.held.iter().collect();
        gems.sort_by(|a, b| b.value.cmp(&a.value));
        gems
    }

    pub fn deposited_count(&self) -> usize {
        self.deposited.len()
    }

    pub fn deposited_value(&self) -> i64 {
        self.deposited.iter().map(|gem| i64::from(gem.value)).sum()
    }

    pub fn deposited_rare(&self) -> usize {
        self.deposited.iter().filter(|gem| gem.kind.is_rare()).count()
    }

    pub fn last_collection(&self) -> Option<CollectionRecord> {
        self.last_collection
    }

    pub fn summary(&self) -> BackpackSummary {
        BackpackSummary {
            held_count: self.held_count(),
            held_weight: self.held_weight(),
            weight_ceiling: self.config.weight_ceiling,
            kinds: self.kind_breakdown(),
            high_value_threshold: self.config.high_value_threshold,
            valuable_count: self.count_above(self.config.high_value_threshold),
            distinct_kinds: self.distinct_kinds().len(),
            rare_held: self.rare_held(),
            deposited_count: self.deposited_count(),
            deposited_value: self.deposited_value(),
            deposited_rare: self.deposited_rare(),
        }
    }

    /// The latest notice, unless it has expired by `now`.
    pub fn current_notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|notice| notice.is_visible(now))
    }

    fn post(&mut self, kind: NoticeKind) {
        debug!(backpack_id = %self.id, ?kind, "Notice posted");
        self.notice = Some(Notice::new(
            kind,
            Instant::now(),
            self.config.notice_duration(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backpack(ceiling: f32) -> Backpack {
        Backpack::new(
            BackpackId(1),
            BackpackCreate {
                pool_id: PoolId(1),
                stats_id: StatsId(1),
                config: BackpackConfig {
                    weight_ceiling: ceiling,
                    ..BackpackConfig::default()
                },
            },
        )
    }

    fn gem(id: u32, kind: GemKind, value: i32, weight: f32) -> Gem {
        Gem::new(GemId(id), kind, value, weight)
    }

    fn values(gems: &[Gem]) -> Vec<i32> {
        gems.iter().map(|gem| gem.value).collect()
    }

    #[test]
    fn capacity_is_inclusive() {
        let mut pack = backpack(50.0);
        pack.stow(gem(0, GemKind::Red, 10, 45.0));
        let capacity = pack.capacity();
        assert!(!capacity.admits(10.0));
        assert_eq!(pack.held_weight(), 45.0);

        assert!(capacity.admits(5.0));
        pack.stow(gem(1, GemKind::Blue, 10, 5.0));
        assert_eq!(pack.held_weight(), 50.0);
        assert!(!pack.capacity().admits(0.5));
    }

    #[test]
    fn top_two_of_three() {
        let mut pack = backpack(100.0);
        for (id, value) in [(0, 10), (1, 50), (2, 30)] {
            pack.stow(gem(id, GemKind::Red, value, 1.0));
        }
        let moved = pack.deposit_top_valuable(2);
        assert_eq!(values(&moved), vec![50, 30]);
        assert_eq!(values(pack.held()), vec![10]);
    }

    #[test]
    fn top_valuable_breaks_ties_by_collection_order() {
        let mut pack = backpack(100.0);
        for (id, value) in [(0, 10), (1, 50), (2, 30), (3, 50), (4, 20)] {
            pack.stow(gem(id, GemKind::Blue, value, 1.0));
        }

        let moved = pack.deposit_top_valuable(3);
        assert_eq!(values(&moved), vec![50, 50, 30]);
        assert_eq!(moved[0].id, GemId(1));
        assert_eq!(moved[1].id, GemId(3));
        assert_eq!(values(pack.held()), vec![10, 20]);
        assert_eq!(pack.deposited_count(), 3);
    }

    #[test]
    fn top_valuable_caps_at_held_count() {
        let mut pack = backpack(100.0);
        pack.stow(gem(0, GemKind::Green, 12, 1.0));
        pack.stow(gem(1, GemKind::Green, 40, 1.0));
        let moved = pack.deposit_top_valuable(10);
        assert_eq!(values(&moved), vec![40, 12]);
        assert!(pack.held().is_empty());
    }

    #[test]
    fn deposit_all_moves_everything() {
        let mut pack = backpack(100.0);
        pack.stow(gem(0, GemKind::Red, 10, 5.0));
        pack.stow(gem(1, GemKind::Rare, 60, 5.0));

        let digests = pack.deposit_all();
        assert_eq!(digests.len(), 2);
        assert_eq!(pack.held_count(), 0);
        assert_eq!(pack.held_weight(), 0.0);
        assert_eq!(pack.deposited_value(), 70);
        assert_eq!(pack.deposited_rare(), 1);
        let notice = pack.current_notice(Instant::now()).unwrap();
        assert_eq!(notice.kind, NoticeKind::Deposited);
    }

    #[test]
    fn empty_deposit_posts_informational_notice() {
        let mut pack = backpack(50.0);
        assert!(pack.deposit_all().is_empty());
        assert_eq!(
            pack.current_notice(Instant::now()).map(|n| n.kind),
            Some(NoticeKind::NothingToDeposit)
        );
    }

    #[test]
    fn derived_queries() {
        let mut pack = backpack(100.0);
        pack.stow(gem(0, GemKind::Red, 10, 2.0));
        pack.stow(gem(1, GemKind::Blue, 35, 3.0));
        pack.stow(gem(2, GemKind::Red, 45, 4.0));
        pack.stow(gem(3, GemKind::Rare, 70, 6.0));

        assert_eq!(pack.held_count(), 4);
        assert_eq!(pack.held_weight(), 15.0);
        assert_eq!(pack.count_above(30), 3);
        assert_eq!(
            pack.distinct_kinds(),
            vec![GemKind::Red, GemKind::Blue, GemKind::Rare]
        );
        assert_eq!(pack.rare_held(), 1);

        let red = pack.kind_breakdown()[0];
        assert_eq!((red.kind, red.count, red.total_value), (GemKind::Red, 2, 55));
        assert_eq!(red.total_weight, 6.0);

        let ordered: Vec<i32> = pack.held_by_value().iter().map(|g| g.value).collect();
        assert_eq!(ordered, vec![70, 45, 35, 10]);

        let summary = pack.summary();
        assert_eq!(summary.valuable_count, 3);
        assert_eq!(summary.distinct_kinds, 3);
        assert_eq!(pack.last_collection().map(|r| r.gem_id), Some(GemId(3)));
    }

    #[test]
    fn apply_changes_only_given_fields() {
        let mut pack = backpack(50.0);
        pack.apply(BackpackUpdate {
            high_value_threshold: Some(12),
            ..BackpackUpdate::default()
        });
        assert_eq!(pack.config().high_value_threshold, 12);
        assert_eq!(pack.config().notice_duration_ms, 2_000);

        pack.apply(BackpackUpdate {
            notice_duration_ms: Some(500),
            ..BackpackUpdate::default()
        });
        assert_eq!(pack.config().notice_duration(), Duration::from_millis(500));
        assert_eq!(pack.config().high_value_threshold, 12);
    }

    #[test]
    fn reject_leaves_state_unchanged() {
        let mut pack = backpack(50.0);
        pack.stow(gem(0, GemKind::Red, 10, 45.0));
        let outcome = pack.reject(10.0);
        assert_eq!(
            outcome,
            CollectOutcome::OverCapacity {
                gem_weight: 10.0,
                held_weight: 45.0,
                ceiling: 50.0
            }
        );
        assert!(!outcome.accepted());
        assert_eq!(pack.held_count(), 1);
        assert_eq!(
            pack.current_notice(Instant::now()).map(|n| n.kind),
            Some(NoticeKind::CapacityExceeded)
        );
    }
}
