/// The reusable set of gems a session draws from.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for GemPool`](#impl-ActorEntity-for-GemPool) for details on:
/// - Creation parameters ([`PoolCreate`])
/// - Update parameters ([`PoolUpdate`])
/// - Custom actions ([`PoolAction`](crate::pool_actor::PoolAction))
use crate::config::{GemTemplate, PoolConfig, SpawnArea};
use crate::model::backpack::Capacity;
use crate::model::gem::{Gem, GemId, GemKind, Position, Rarity};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Type-safe identifier for pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolId(pub u32);

impl From<u32> for PoolId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pool_{}", self.0)
    }
}

/// Payload for creating a pool.
#[derive(Debug, Clone)]
pub struct PoolCreate {
    pub config: PoolConfig,
}

/// Payload for retuning a pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolUpdate {
    pub rare_chance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolStatus {
    Ready,
    /// No common template was configured; nothing ever activates.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnEvent {
    Spawn,
    SpawnRare,
}

/// One activation, as kept in the pool's spawn history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub event: SpawnEvent,
    pub gem_id: GemId,
    pub kind: GemKind,
    pub value: i32,
    pub weight: f32,
    /// Time since the pool was created.
    pub at: Duration,
}

/// How the pool's slots are partitioned right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolCensus {
    pub slots: usize,
    pub pooled: usize,
    pub active: usize,
    /// Slots whose gem was claimed by a backpack. Never reused.
    pub released: usize,
}

/// Result of a backpack trying to take an active gem.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// The gem left the pool and now belongs to the caller.
    Claimed(Gem),
    /// The gem would push the caller over its ceiling; nothing changed.
    TooHeavy { weight: f32 },
    /// No active gem with that id.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct GemPool {
    pub id: PoolId,
    status: PoolStatus,
    config: PoolConfig,
    /// `None` marks a released slot.
    slots: Vec<Option<Gem>>,
    history: Vec<SpawnRecord>,
    rng: SmallRng,
    started_at: Instant,
}

impl GemPool {
    /// Creates a pool with `config.initial_size` pooled slots.
    ///
    /// Without a common template the pool is created disabled and empty; this
    /// is reported here, once.
    pub fn new(id: PoolId, config: PoolConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let (status, slots) = if config.common.is_some() {
            let slots = (0..config.initial_size)
                .map(|index| Some(Gem::pooled(GemId(index as u32))))
                .collect();
            (PoolStatus::Ready, slots)
        } else {
            error!(pool_id = %id, "Common gem template missing; pool disabled for this session");
            (PoolStatus::Disabled, Vec::new())
        };

        Self {
            id,
            status,
            config,
            slots,
            history: Vec::new(),
            rng,
            started_at: Instant::now(),
        }
    }

    pub fn status(&self) -> PoolStatus {
        self.status
    }

    pub fn is_enabled(&self) -> bool {
        self.status == PoolStatus::Ready
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn rare_chance(&self) -> f64 {
        self.config.rare_chance
    }

    /// Callers validate `chance` to `[0, 1]`.
    pub(crate) fn set_rare_chance(&mut self, chance: f64) {
        self.config.rare_chance = chance;
    }

    /// Draws a gem into the scene and returns a snapshot of it.
    ///
    /// Picks the first pooled slot, or grows the pool by one when every
    /// occupied slot is active. Returns `None` only when the pool is disabled.
    pub fn activate_one(&mut self) -> Option<Gem> {
        if !self.is_enabled() {
            debug!(pool_id = %self.id, "Pool disabled; activation skipped");
            return None;
        }

        let rarity = roll_rarity(
            &mut self.rng,
            self.config.rare_chance,
            self.config.rare.is_some(),
        );
        let template = self.config.template(rarity).copied()?;
        let (kind, value, weight) = draw_attributes(&mut self.rng, rarity, &template)?;
        let position = sample_position(&mut self.rng, &self.config.spawn_area);
        let at = self.started_at.elapsed();

        let index = match self.first_available() {
            Some(index) => index,
            None => self.grow(),
        };
        let gem = self.slots.get_mut(index)?.as_mut()?;
        gem.initialize(kind, value, weight);
        gem.position = position;
        gem.active = true;
        let snapshot = gem.clone();

        self.history.push(SpawnRecord {
            event: match rarity {
                Rarity::Common => SpawnEvent::Spawn,
                Rarity::Rare => SpawnEvent::SpawnRare,
            },
            gem_id: snapshot.id,
            kind,
            value,
            weight,
            at,
        });
        debug!(pool_id = %self.id, gem_id = %snapshot.id, %kind, value, weight, "Gem activated");
        Some(snapshot)
    }

    /// Takes an active gem out of the pool if `capacity` admits its weight.
    ///
    /// The check and the removal happen in one step, so the weight the caller
    /// is judged on is the weight it receives.
    pub fn claim(&mut self, id: GemId, capacity: Capacity) -> ClaimOutcome {
        let Some(slot) = self.slots.get_mut(id.0 as usize) else {
            return ClaimOutcome::Unavailable;
        };
        let weight = match slot.as_ref() {
            Some(gem) if gem.active => gem.weight,
            _ => return ClaimOutcome::Unavailable,
        };
        if !capacity.admits(weight) {
            return ClaimOutcome::TooHeavy { weight };
        }
        match slot.take() {
            Some(mut gem) => {
                gem.active = false;
                ClaimOutcome::Claimed(gem)
            }
            None => ClaimOutcome::Unavailable,
        }
    }

    /// Returns an active gem to the pool without it being collected.
    pub fn deactivate(&mut self, id: GemId) -> bool {
        match self.slots.get_mut(id.0 as usize).and_then(Option::as_mut) {
            Some(gem) if gem.active => {
                gem.active = false;
                true
            }
            _ => false,
        }
    }

    /// The gem in slot `id`, if the slot has not been released.
    pub fn gem(&self, id: GemId) -> Option<&Gem> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn active_gems(&self) -> impl Iterator<Item = &Gem> {
        self.slots.iter().flatten().filter(|gem| gem.active)
    }

    pub fn census(&self) -> PoolCensus {
        let mut census = PoolCensus {
            slots: self.slots.len(),
            ..PoolCensus::default()
        };
        for slot in &self.slots {
            match slot {
                Some(gem) if gem.active => census.active += 1,
                Some(_) => census.pooled += 1,
                None => census.released += 1,
            }
        }
        census
    }

    pub fn spawn_history(&self) -> &[SpawnRecord] {
        &self.history
    }

    fn first_available(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some(gem) if !gem.active))
    }

    fn grow(&mut self) -> usize {
        let index = self.slots.len();
        self.slots.push(Some(Gem::pooled(GemId(index as u32))));
        info!(pool_id = %self.id, slots = self.slots.len(), "Pool grew");
        index
    }
}

/// Rare with probability `rare_chance`, and only when rare gems can spawn at all.
pub fn roll_rarity(rng: &mut impl Rng, rare_chance: f64, rare_spawnable: bool) -> Rarity {
    if rare_spawnable && rng.gen_bool(rare_chance.clamp(0.0, 1.0)) {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

fn draw_attributes(
    rng: &mut impl Rng,
    rarity: Rarity,
    template: &GemTemplate,
) -> Option<(GemKind, i32, f32)> {
    let kind = match rarity {
        Rarity::Common => *GemKind::COMMON.choose(rng)?,
        Rarity::Rare => GemKind::Rare,
    };
    let value = rng.gen_range(template.value.min..=template.value.max);
    let weight = rng.gen_range(template.weight.min..=template.weight.max);
    Some((kind, value, weight))
}

fn sample_position(rng: &mut impl Rng, area: &SpawnArea) -> Position {
    Position::new(
        sample_axis(rng, area.min.x, area.max.x),
        sample_axis(rng, area.min.y, area.max.y),
        sample_axis(rng, area.min.z, area.max.z),
    )
}

fn sample_axis(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded(initial_size: usize) -> GemPool {
        let config = PoolConfig {
            initial_size,
            seed: Some(7),
            ..PoolConfig::default()
        };
        GemPool::new(PoolId(1), config)
    }

    fn roomy() -> Capacity {
        Capacity {
            held_weight: 0.0,
            ceiling: 1_000.0,
        }
    }

    #[test]
    fn grows_when_every_slot_is_active() {
        let mut pool = seeded(5);
        for _ in 0..5 {
            pool.activate_one().unwrap();
        }
        assert_eq!(pool.census().slots, 5);

        let sixth = pool.activate_one().unwrap();
        assert_eq!(sixth.id, GemId(5));
        assert_eq!(pool.census().slots, 6);
        assert_eq!(pool.census().active, 6);
    }

    #[test]
    fn active_gems_never_share_a_slot() {
        let mut pool = seeded(3);
        let ids: Vec<GemId> = (0..10).map(|_| pool.activate_one().unwrap().id).collect();
        let unique: HashSet<GemId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(pool.active_gems().count(), 10);
    }

    #[test]
    fn reuses_first_pooled_slot() {
        let mut pool = seeded(3);
        for _ in 0..3 {
            pool.activate_one().unwrap();
        }
        assert!(pool.deactivate(GemId(1)));
        let gem = pool.activate_one().unwrap();
        assert_eq!(gem.id, GemId(1));
        assert_eq!(pool.census().slots, 3);
    }

    #[test]
    fn attributes_stay_inside_template_ranges() {
        let mut pool = seeded(0);
        let config = pool.config().clone();
        for _ in 0..200 {
            let gem = pool.activate_one().unwrap();
            let template = config.template(gem.rarity()).unwrap();
            assert!((template.value.min..=template.value.max).contains(&gem.value));
            assert!(gem.weight >= template.weight.min && gem.weight <= template.weight.max);
            assert!(config.spawn_area.contains(&gem.position));
            assert!(gem.active);
        }
    }

    #[test]
    fn no_rare_gems_without_rare_template() {
        let config = PoolConfig {
            rare_chance: 1.0,
            rare: None,
            seed: Some(3),
            ..PoolConfig::default()
        };
        let mut pool = GemPool::new(PoolId(1), config);
        for _ in 0..50 {
            assert_eq!(pool.activate_one().unwrap().rarity(), Rarity::Common);
        }
    }

    #[test]
    fn certain_rare_chance_spawns_rare() {
        let config = PoolConfig {
            rare_chance: 1.0,
            seed: Some(3),
            ..PoolConfig::default()
        };
        let mut pool = GemPool::new(PoolId(1), config);
        let gem = pool.activate_one().unwrap();
        assert_eq!(gem.kind, GemKind::Rare);
        assert_eq!(pool.spawn_history()[0].event, SpawnEvent::SpawnRare);
    }

    #[test]
    fn disabled_pool_never_activates() {
        let config = PoolConfig {
            common: None,
            ..PoolConfig::default()
        };
        let mut pool = GemPool::new(PoolId(1), config);
        assert_eq!(pool.status(), PoolStatus::Disabled);
        assert!(pool.activate_one().is_none());
        assert_eq!(pool.census(), PoolCensus::default());
    }

    #[test]
    fn claim_releases_the_slot() {
        let mut pool = seeded(2);
        let gem = pool.activate_one().unwrap();

        let ClaimOutcome::Claimed(claimed) = pool.claim(gem.id, roomy()) else {
            panic!("expected the gem to be claimed");
        };
        assert_eq!(claimed.id, gem.id);
        assert!(!claimed.active);
        assert!(pool.gem(gem.id).is_none());
        assert_eq!(pool.claim(gem.id, roomy()), ClaimOutcome::Unavailable);

        let census = pool.census();
        assert_eq!((census.released, census.pooled, census.active), (1, 1, 0));

        // Released slots are never handed out again.
        let next = pool.activate_one().unwrap();
        assert_ne!(next.id, gem.id);
    }

    #[test]
    fn claim_refuses_pooled_and_heavy_gems() {
        let mut pool = seeded(2);
        assert_eq!(pool.claim(GemId(0), roomy()), ClaimOutcome::Unavailable);
        assert_eq!(pool.claim(GemId(99), roomy()), ClaimOutcome::Unavailable);

        let gem = pool.activate_one().unwrap();
        let full = Capacity {
            held_weight: 50.0,
            ceiling: 50.0,
        };
        assert_eq!(
            pool.claim(gem.id, full),
            ClaimOutcome::TooHeavy { weight: gem.weight }
        );
        assert!(pool.gem(gem.id).unwrap().active);
    }

    #[test]
    fn degenerate_axis_yields_its_value() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(sample_axis(&mut rng, 0.5, 0.5), 0.5);
    }
}
