//! Session configuration.
//!
//! Values only, no behaviour: pool size and growth seed, rare chance, spawn
//! area, per-tier templates, backpack ceiling and notice timing. Loaded from
//! TOML; the shipped defaults live in `src/data/session.toml` and match
//! [`SessionConfig::default`].

use crate::model::{Position, Rarity};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const BUILTIN_SESSION_CONFIG: &str = include_str!("data/session.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse session config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read session config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid session config `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub pool: PoolConfig,
    pub backpack: BackpackConfig,
    pub scene: SceneConfig,
}

impl SessionConfig {
    /// The configuration shipped with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_SESSION_CONFIG)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Rejects values no session can run with.
    ///
    /// A missing common template is *not* rejected here: it disables the pool
    /// for the session instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pool.validate()?;

        let ceiling = self.backpack.weight_ceiling;
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(invalid(
                "backpack.weight_ceiling",
                format!("{ceiling} is not a positive weight"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Slots instantiated when the pool is created.
    pub initial_size: usize,
    /// Probability that a draw is rare, when a rare template exists.
    pub rare_chance: f64,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    /// Gems activated by the staggered start-up population.
    pub initial_spawn: usize,
    pub spawn_interval_ms: u64,
    pub spawn_area: SpawnArea,
    /// Required. Without it the pool never activates anything.
    #[serde(default)]
    pub common: Option<GemTemplate>,
    /// Optional. Without it every draw is common.
    #[serde(default)]
    pub rare: Option<GemTemplate>,
}

impl PoolConfig {
    /// Checks the rare chance, the spawn area and both templates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.rare_chance) {
            return Err(invalid(
                "pool.rare_chance",
                format!("{} is outside [0, 1]", self.rare_chance),
            ));
        }
        self.spawn_area.validate()?;
        if let Some(template) = &self.common {
            template.validate("pool.common")?;
        }
        if let Some(template) = &self.rare {
            template.validate("pool.rare")?;
        }
        Ok(())
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn template(&self, rarity: Rarity) -> Option<&GemTemplate> {
        match rarity {
            Rarity::Common => self.common.as_ref(),
            Rarity::Rare => self.rare.as_ref(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 20,
            rare_chance: 0.1,
            seed: None,
            initial_spawn: 10,
            spawn_interval_ms: 50,
            spawn_area: SpawnArea::default(),
            common: Some(GemTemplate {
                value: ValueRange { min: 10, max: 49 },
                weight: WeightRange { min: 1.0, max: 10.0 },
            }),
            rare: Some(GemTemplate {
                value: ValueRange { min: 50, max: 99 },
                weight: WeightRange { min: 5.0, max: 15.0 },
            }),
        }
    }
}

/// Attribute ranges for one spawn tier. Both ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GemTemplate {
    pub value: ValueRange,
    pub weight: WeightRange,
}

impl GemTemplate {
    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.value.min > self.value.max {
            return Err(invalid(
                field,
                format!("value range {}..={} is inverted", self.value.min, self.value.max),
            ));
        }
        let WeightRange { min, max } = self.weight;
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(invalid(
                field,
                format!("weight range {min}..={max} is not a finite ascending range"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: f32,
    pub max: f32,
}

/// Axis-aligned box gems are placed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub min: Position,
    pub max: Position,
}

impl SpawnArea {
    fn validate(&self) -> Result<(), ConfigError> {
        let axes = [
            (self.min.x, self.max.x),
            (self.min.y, self.max.y),
            (self.min.z, self.max.z),
        ];
        if axes
            .iter()
            .any(|(lo, hi)| !lo.is_finite() || !hi.is_finite() || lo > hi)
        {
            return Err(invalid(
                "pool.spawn_area",
                format!("{:?} does not span a box", self),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, position: &Position) -> bool {
        (self.min.x..=self.max.x).contains(&position.x)
            && (self.min.y..=self.max.y).contains(&position.y)
            && (self.min.z..=self.max.z).contains(&position.z)
    }
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self {
            min: Position::new(-10.0, 0.5, -10.0),
            max: Position::new(10.0, 0.5, 10.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackpackConfig {
    pub weight_ceiling: f32,
    /// How long a notice stays visible.
    pub notice_duration_ms: u64,
    /// Held gems worth strictly more than this count as valuable.
    pub high_value_threshold: i32,
}

impl BackpackConfig {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}

impl Default for BackpackConfig {
    fn default() -> Self {
        Self {
            weight_ceiling: 50.0,
            notice_duration_ms: 2_000,
            high_value_threshold: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Active gems worth strictly more than this count as valuable.
    pub high_value_threshold: i32,
    /// Gems listed in a scene report's preview.
    pub preview_len: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: 40,
            preview_len: 5,
        }
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
