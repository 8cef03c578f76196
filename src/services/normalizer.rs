use std::cmp::Ordering;

use crate::models::{BaseScoreIndex, Recipe, Score};

/// Rating counts above this add nothing to the taste index
const MAX_RATING_COUNT: i64 = 500;

/// Healthiness index multiplier when protein is unknown or zero
const SUGAR_ONLY_FACTOR: f64 = 10.0;

/// One of the five normalized metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Cost,
    Effort,
    Healthiness,
    Taste,
    Recency,
}

impl Metric {
    const ALL: [Metric; 5] = [
        Metric::Cost,
        Metric::Effort,
        Metric::Healthiness,
        Metric::Taste,
        Metric::Recency,
    ];

    fn higher_is_worse(self) -> bool {
        matches!(self, Metric::Cost | Metric::Effort | Metric::Healthiness)
    }

    fn index(self, index: &BaseScoreIndex) -> f64 {
        match self {
            Metric::Cost => index.cost,
            Metric::Effort => index.effort,
            Metric::Healthiness => index.healthiness,
            Metric::Taste => index.taste,
            Metric::Recency => index.recency,
        }
    }

    fn slot(self, score: &mut Score) -> &mut i32 {
        match self {
            Metric::Cost => &mut score.cost,
            Metric::Effort => &mut score.effort,
            Metric::Healthiness => &mut score.healthiness,
            Metric::Taste => &mut score.taste,
            Metric::Recency => &mut score.recency,
        }
    }

    /// Orders least desirable first
    fn worst_first(self, x: f64, y: f64) -> Ordering {
        if self.higher_is_worse() {
            y.total_cmp(&x)
        } else {
            x.total_cmp(&y)
        }
    }
}

/// Computes the raw, pre-normalization signals for one recipe
pub fn compute_base_score_index(recipe: &Recipe) -> BaseScoreIndex {
    let ingredients = recipe.ingredients.len() as f64;

    let sugar = recipe.nutrition.sugar_grams();
    let protein = recipe.nutrition.protein_grams();
    let healthiness = if protein > 0.0 {
        100.0 * sugar / protein
    } else {
        sugar * SUGAR_ONLY_FACTOR
    };

    let taste =
        100.0 * recipe.rating_value + recipe.rating_count.clamp(0, MAX_RATING_COUNT) as f64;

    let epoch_hours = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map(|t| t.timestamp().div_euclid(3600)).unwrap_or(0) as f64
    };
    let recency = epoch_hours(recipe.date_published) + epoch_hours(recipe.date_modified);

    BaseScoreIndex {
        cost: ingredients,
        effort: ingredients + recipe.total_minutes() as f64,
        healthiness,
        taste,
        recency,
    }
}

/// Fills in `base_score_index` and corpus-relative `base_score` for every recipe
///
/// For each metric the corpus is ordered least desirable first; the recipe at
/// position `i` of `n` gets percentile `round(100 * i / n)`. Ties keep corpus
/// order. An empty corpus is left untouched.
pub fn compute_base_scores(recipes: &mut [Recipe]) {
    let n = recipes.len();
    if n == 0 {
        tracing::warn!("Empty recipe corpus, skipping normalization");
        return;
    }

    for recipe in recipes.iter_mut() {
        recipe.base_score_index = compute_base_score_index(recipe);
        recipe.base_score = Score::default();
    }

    let mut order: Vec<usize> = Vec::with_capacity(n);
    for metric in Metric::ALL {
        order.clear();
        order.extend(0..n);
        order.sort_by(|&a, &b| {
            metric.worst_first(
                metric.index(&recipes[a].base_score_index),
                metric.index(&recipes[b].base_score_index),
            )
        });

        for (position, &idx) in order.iter().enumerate() {
            *metric.slot(&mut recipes[idx].base_score) = percentile(position, n);
        }

        tracing::debug!(metric = ?metric, recipes = n, "Assigned percentiles");
    }

    tracing::info!(recipes = n, "Computed corpus base scores");
}

/// `round(100 * position / n)` in integer arithmetic
fn percentile(position: usize, n: usize) -> i32 {
    ((100 * position + n / 2) / n) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;
    use chrono::{TimeZone, Utc};

    fn recipe_with_ingredients(url: &str, count: usize) -> Recipe {
        Recipe {
            url: url.to_string(),
            ingredients: (0..count).map(|i| format!("ingredient {}", i)).collect(),
            total_time: Some("PT30M".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_base_score_index() {
        let recipe = Recipe {
            ingredients: vec!["a".into(), "b".into(), "c".into()],
            nutrition: Nutrition {
                sugar_content: Some("5 g".to_string()),
                protein_content: Some("20 g".to_string()),
                ..Default::default()
            },
            rating_value: 4.5,
            rating_count: 812,
            date_published: Some(Utc.timestamp_opt(7200 + 1800, 0).unwrap()),
            date_modified: Some(Utc.timestamp_opt(36000, 0).unwrap()),
            total_time: Some("PT1H".to_string()),
            ..Default::default()
        };

        let index = compute_base_score_index(&recipe);
        assert_eq!(index.cost, 3.0);
        assert_eq!(index.effort, 63.0);
        assert_eq!(index.healthiness, 25.0);
        assert_eq!(index.taste, 950.0);
        assert_eq!(index.recency, 12.0);
    }

    #[test]
    fn test_base_score_index_defaults() {
        let recipe = Recipe {
            nutrition: Nutrition {
                sugar_content: Some("7 g".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let index = compute_base_score_index(&recipe);
        assert_eq!(index.effort, 60.0);
        assert_eq!(index.healthiness, 70.0);
        assert_eq!(index.taste, 0.0);
        assert_eq!(index.recency, 0.0);
    }

    #[test]
    fn test_cost_percentile_inverts_badness() {
        let mut recipes: Vec<Recipe> = [1, 2, 3, 4]
            .iter()
            .map(|&c| recipe_with_ingredients(&format!("http://x/{}", c), c))
            .collect();

        compute_base_scores(&mut recipes);

        let cost: Vec<i32> = recipes.iter().map(|r| r.base_score.cost).collect();
        assert_eq!(cost, vec![75, 50, 25, 0]);
    }

    #[test]
    fn test_taste_percentile_higher_is_better() {
        let mut recipes: Vec<Recipe> = [4.9, 3.0, 4.0]
            .iter()
            .map(|&v| Recipe {
                rating_value: v,
                ..Default::default()
            })
            .collect();

        compute_base_scores(&mut recipes);

        // ascending: 3.0 -> 0, 4.0 -> round(33.3), 4.9 -> round(66.7)
        let taste: Vec<i32> = recipes.iter().map(|r| r.base_score.taste).collect();
        assert_eq!(taste, vec![67, 0, 33]);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let mut recipes: Vec<Recipe> = (0..4)
            .map(|i| recipe_with_ingredients(&format!("http://x/{}", i), 2))
            .collect();

        compute_base_scores(&mut recipes);

        let cost: Vec<i32> = recipes.iter().map(|r| r.base_score.cost).collect();
        assert_eq!(cost, vec![0, 25, 50, 75]);
    }

    #[test]
    fn test_percentiles_in_range() {
        let mut recipes: Vec<Recipe> = (0..37)
            .map(|i| recipe_with_ingredients(&format!("http://x/{}", i), i % 7))
            .collect();

        compute_base_scores(&mut recipes);

        for r in &recipes {
            let s = r.base_score;
            for c in [s.taste, s.cost, s.effort, s.healthiness, s.recency] {
                assert!((0..=100).contains(&c));
            }
            assert_eq!(s.total, 0);
        }
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut recipes: Vec<Recipe> = [5, 1, 3]
            .iter()
            .map(|&c| recipe_with_ingredients(&format!("http://x/{}", c), c))
            .collect();

        compute_base_scores(&mut recipes);
        let first: Vec<Score> = recipes.iter().map(|r| r.base_score).collect();
        compute_base_scores(&mut recipes);
        let second: Vec<Score> = recipes.iter().map(|r| r.base_score).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_corpus() {
        let mut recipes: Vec<Recipe> = vec![];
        compute_base_scores(&mut recipes);
        assert!(recipes.is_empty());
    }

    #[test]
    fn test_percentile_rounding() {
        assert_eq!(percentile(0, 3), 0);
        assert_eq!(percentile(1, 3), 33);
        assert_eq!(percentile(2, 3), 67);
        assert_eq!(percentile(1, 8), 13);
    }
}
