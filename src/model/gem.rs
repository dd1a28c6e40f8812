//! The collectible unit and its small value types.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use tracing::warn;

/// Slot index of a gem inside its pool. Stable across reuse of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GemId(pub u32);

impl Display for GemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gem_{}", self.0)
    }
}

/// Category of a gem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemKind {
    Red,
    Blue,
    Green,
    Rare,
}

impl GemKind {
    /// Kinds a common draw picks from, uniformly.
    pub const COMMON: [GemKind; 3] = [GemKind::Red, GemKind::Blue, GemKind::Green];

    pub fn rarity(self) -> Rarity {
        match self {
            GemKind::Rare => Rarity::Rare,
            GemKind::Red | GemKind::Blue | GemKind::Green => Rarity::Common,
        }
    }

    pub fn is_rare(self) -> bool {
        self.rarity() == Rarity::Rare
    }
}

impl Display for GemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GemKind::Red => "Red",
            GemKind::Blue => "Blue",
            GemKind::Green => "Green",
            GemKind::Rare => "Rare",
        };
        f.write_str(name)
    }
}

/// Spawn tier. Selects which template ranges a draw uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
}

/// A point in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f32; 3]> for Position {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// One collectible instance.
///
/// A gem lives in exactly one place: a pool slot, a backpack's held set, or a
/// backpack's deposited record. It is moved between them, never shared; the
/// clones handed out by snapshots are read-only copies for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gem {
    pub id: GemId,
    pub kind: GemKind,
    pub value: i32,
    pub weight: f32,
    pub active: bool,
    pub position: Position,
}

impl Gem {
    /// A gem with the given attributes, inactive at the origin.
    ///
    /// Out-of-range attributes are reported, not rejected.
    pub fn new(id: GemId, kind: GemKind, value: i32, weight: f32) -> Self {
        let mut gem = Self::pooled(id);
        gem.initialize(kind, value, weight);
        gem
    }

    /// A freshly instantiated pool slot. Attributes are placeholders until the
    /// slot's first draw re-initializes it.
    pub(crate) fn pooled(id: GemId) -> Self {
        Self {
            id,
            kind: GemKind::Red,
            value: 0,
            weight: 1.0,
            active: false,
            position: Position::ORIGIN,
        }
    }

    /// Reassigns kind, value and weight.
    ///
    /// A negative value or a non-positive weight logs a warning and is kept as is.
    pub fn initialize(&mut self, kind: GemKind, value: i32, weight: f32) {
        if value < 0 || weight <= 0.0 {
            warn!(gem_id = %self.id, %kind, value, weight, "Invalid gem attributes");
        }
        self.kind = kind;
        self.value = value;
        self.weight = weight;
    }

    pub fn is_valid(&self) -> bool {
        self.value >= 0 && self.weight > 0.0
    }

    pub fn rarity(&self) -> Rarity {
        self.kind.rarity()
    }

    pub fn digest(&self) -> GemDigest {
        GemDigest {
            id: self.id,
            kind: self.kind,
            value: self.value,
            weight: self.weight,
        }
    }
}

/// The attributes other components need to know about a gem, without the gem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GemDigest {
    pub id: GemId,
    pub kind: GemKind,
    pub value: i32,
    pub weight: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_attributes_are_kept() {
        let gem = Gem::new(GemId(3), GemKind::Blue, -5, 0.0);
        assert_eq!(gem.value, -5);
        assert_eq!(gem.weight, 0.0);
        assert!(!gem.is_valid());
        assert!(!gem.active);
    }

    #[test]
    fn rarity_follows_kind() {
        assert_eq!(GemKind::Rare.rarity(), Rarity::Rare);
        for kind in GemKind::COMMON {
            assert_eq!(kind.rarity(), Rarity::Common);
        }
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 0.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < f32::EPSILON);
    }
}
