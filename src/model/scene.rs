//! Read-only analysis of the gems currently active in the scene.

use crate::config::SceneConfig;
use crate::model::gem::{Gem, GemDigest, GemId, GemKind, Position};
use serde::{Deserialize, Serialize};

/// Min, max and mean of one attribute. All zero over an empty scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spread<T> {
    pub min: T,
    pub max: T,
    pub mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueBand {
    /// Below 20.
    Low,
    /// 20 up to, not including, 40.
    Medium,
    /// 40 and above.
    High,
}

impl ValueBand {
    pub fn of(value: i32) -> Self {
        match value {
            v if v < 20 => ValueBand::Low,
            v if v < 40 => ValueBand::Medium,
            _ => ValueBand::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestGem {
    pub gem_id: GemId,
    pub kind: GemKind,
    pub value: i32,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneReport {
    pub total: usize,
    pub value: Spread<i32>,
    pub weight: Spread<f32>,
    pub high_value_threshold: i32,
    /// Gems worth strictly more than the threshold.
    pub high_value_count: usize,
    pub high_value_percent: f32,
    pub rare_count: usize,
    /// In order of first appearance.
    pub bands: Vec<(ValueBand, usize)>,
    /// In order of first appearance.
    pub by_kind: Vec<(GemKind, usize)>,
    /// Only when an observer position was given and the scene is not empty.
    pub nearest: Option<NearestGem>,
    pub preview: Vec<GemDigest>,
}

impl SceneReport {
    pub fn analyze<'a>(
        gems: impl IntoIterator<Item = &'a Gem>,
        observer: Option<Position>,
        config: &SceneConfig,
    ) -> Self {
        let gems: Vec<&Gem> = gems.into_iter().collect();
        let mut report = SceneReport {
            total: gems.len(),
            high_value_threshold: config.high_value_threshold,
            ..SceneReport::default()
        };
        if gems.is_empty() {
            return report;
        }

        let total = gems.len() as f64;
        let mut value = Spread {
            min: i32::MAX,
            max: i32::MIN,
            mean: 0.0,
        };
        let mut weight = Spread {
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            mean: 0.0,
        };
        let (mut value_sum, mut weight_sum) = (0i64, 0f64);

        for gem in &gems {
            value.min = value.min.min(gem.value);
            value.max = value.max.max(gem.value);
            value_sum += i64::from(gem.value);
            weight.min = weight.min.min(gem.weight);
            weight.max = weight.max.max(gem.weight);
            weight_sum += f64::from(gem.weight);

            if gem.value > config.high_value_threshold {
                report.high_value_count += 1;
            }
            if gem.kind.is_rare() {
                report.rare_count += 1;
            }
            bump(&mut report.bands, ValueBand::of(gem.value));
            bump(&mut report.by_kind, gem.kind);
        }
        value.mean = value_sum as f64 / total;
        weight.mean = weight_sum / total;
        report.value = value;
        report.weight = weight;
        report.high_value_percent = (report.high_value_count as f64 / total * 100.0) as f32;

        report.nearest = observer.and_then(|at| {
            gems.iter()
                .map(|gem| (gem, gem.position.distance(&at)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(gem, distance)| NearestGem {
                    gem_id: gem.id,
                    kind: gem.kind,
                    value: gem.value,
                    distance,
                })
        });
        report.preview = gems
            .iter()
            .take(config.preview_len)
            .map(|gem| gem.digest())
            .collect();
        report
    }
}

fn bump<K: PartialEq>(counts: &mut Vec<(K, usize)>, key: K) {
    match counts.iter_mut().find(|(k, _)| *k == key) {
        Some((_, count)) => *count += 1,
        None => counts.push((key, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(id: u32, kind: GemKind, value: i32, weight: f32, x: f32) -> Gem {
        let mut gem = Gem::new(GemId(id), kind, value, weight);
        gem.position = Position::new(x, 0.5, 0.0);
        gem.active = true;
        gem
    }

    #[test]
    fn empty_scene_is_all_zero() {
        let none: Vec<Gem> = Vec::new();
        let report = SceneReport::analyze(&none, Some(Position::ORIGIN), &SceneConfig::default());
        assert_eq!(report.total, 0);
        assert_eq!(report.value, Spread::default());
        assert_eq!(report.weight, Spread::default());
        assert!(report.nearest.is_none());
        assert_eq!(report.high_value_threshold, 40);
    }

    #[test]
    fn summarizes_active_gems() {
        let gems = vec![
            placed(0, GemKind::Red, 10, 2.0, 5.0),
            placed(1, GemKind::Rare, 80, 10.0, -1.0),
            placed(2, GemKind::Red, 30, 4.0, 3.0),
            placed(3, GemKind::Blue, 40, 6.0, 8.0),
        ];
        let observer = Position::new(0.0, 0.5, 0.0);
        let report = SceneReport::analyze(&gems, Some(observer), &SceneConfig::default());

        assert_eq!(report.total, 4);
        assert_eq!((report.value.min, report.value.max), (10, 80));
        assert_eq!(report.value.mean, 40.0);
        assert_eq!((report.weight.min, report.weight.max), (2.0, 10.0));
        // 40 is not strictly above the threshold.
        assert_eq!(report.high_value_count, 1);
        assert_eq!(report.high_value_percent, 25.0);
        assert_eq!(report.rare_count, 1);
        assert_eq!(
            report.bands,
            vec![(ValueBand::Low, 1), (ValueBand::High, 2), (ValueBand::Medium, 1)]
        );
        assert_eq!(
            report.by_kind,
            vec![(GemKind::Red, 2), (GemKind::Rare, 1), (GemKind::Blue, 1)]
        );

        let nearest = report.nearest.unwrap();
        assert_eq!(nearest.gem_id, GemId(1));
        assert!((nearest.distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn preview_is_bounded() {
        let gems: Vec<Gem> = (0..8)
            .map(|i| placed(i, GemKind::Green, 15, 1.0, 0.0))
            .collect();
        let config = SceneConfig {
            preview_len: 3,
            ..SceneConfig::default()
        };
        let report = SceneReport::analyze(&gems, None, &config);
        let ids: Vec<GemId> = report.preview.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![GemId(0), GemId(1), GemId(2)]);
        assert!(report.nearest.is_none());
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(ValueBand::of(19), ValueBand::Low);
        assert_eq!(ValueBand::of(20), ValueBand::Medium);
        assert_eq!(ValueBand::of(39), ValueBand::Medium);
        assert_eq!(ValueBand::of(40), ValueBand::High);
    }
}
