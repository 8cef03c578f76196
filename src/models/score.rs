use serde::{Deserialize, Serialize};

use super::Options;

/// Multi-attribute rating, every component a percentage in [0, 100]
///
/// All five components are oriented so that higher is better. `total` is
/// derived from the components and an `Options` weighting; it is only stored
/// here as a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub taste: i32,
    pub cost: i32,
    pub effort: i32,
    pub healthiness: i32,
    pub recency: i32,
    pub total: i32,
}

/// A score paired with its weight in an average
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeight {
    pub score: Score,
    pub weight: i64,
}

impl ScoreWeight {
    pub fn new(score: Score, weight: i64) -> Self {
        Self { score, weight }
    }
}

impl Score {
    /// Weighted mean of the five components under the given options
    ///
    /// Returns 0 when all weights sum to zero.
    pub fn compute_total(&self, options: &Options) -> i32 {
        let pairs = [
            (self.cost, options.cost_weight),
            (self.effort, options.effort_weight),
            (self.healthiness, options.healthiness_weight),
            (self.taste, options.taste_weight),
            (self.recency, options.recency_weight),
        ];

        let weight_sum = options.weight_sum();
        if weight_sum == 0 {
            return 0;
        }

        let weighted: i128 = pairs
            .iter()
            .map(|(c, w)| i128::from(*c) * i128::from(*w))
            .sum();

        weighted_mean(weighted, i128::from(weight_sum))
    }

    /// Returns a copy with `total` recomputed for the given options
    pub fn with_total(mut self, options: &Options) -> Self {
        self.total = self.compute_total(options);
        self
    }

    /// Clamps every component into [0, 100]
    pub fn clamped(self) -> Self {
        Self {
            taste: self.taste.clamp(0, 100),
            cost: self.cost.clamp(0, 100),
            effort: self.effort.clamp(0, 100),
            healthiness: self.healthiness.clamp(0, 100),
            recency: self.recency.clamp(0, 100),
            total: self.total.clamp(0, 100),
        }
    }
}

/// Weighted average of a set of scores, component by component
///
/// Each component, `total` included, is `Σ(cᵢ × wᵢ) / Σ(wᵢ)` with truncating
/// integer division. An empty input, or one whose weights sum to zero,
/// yields the zero score.
pub fn average_score(score_weights: &[ScoreWeight]) -> Score {
    if score_weights.is_empty() {
        return Score::default();
    }

    let weight_sum: i128 = score_weights.iter().map(|sw| i128::from(sw.weight)).sum();
    if weight_sum == 0 {
        tracing::warn!(
            samples = score_weights.len(),
            "Weighted average with zero total weight, using zero score"
        );
        return Score::default();
    }

    let component = |get: fn(&Score) -> i32| -> i32 {
        let weighted: i128 = score_weights
            .iter()
            .map(|sw| i128::from(get(&sw.score)) * i128::from(sw.weight))
            .sum();
        weighted_mean(weighted, weight_sum)
    };

    Score {
        taste: component(|s| s.taste),
        cost: component(|s| s.cost),
        effort: component(|s| s.effort),
        healthiness: component(|s| s.healthiness),
        recency: component(|s| s.recency),
        total: component(|s| s.total),
    }
}

/// Truncating quotient, saturated to the `i32` range
fn weighted_mean(weighted: i128, weight_sum: i128) -> i32 {
    let mean = weighted / weight_sum;
    i32::try_from(mean).unwrap_or(if mean < 0 { i32::MIN } else { i32::MAX })
}
