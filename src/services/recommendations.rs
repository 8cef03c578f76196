use std::collections::HashSet;

use crate::{
    models::{average_score, Options, Recipe, Score, ScoreWeight, WordScoreMap},
    services::tokenizer::Tokenizer,
};

/// Recommendations returned per page
pub const PAGE_SIZE: usize = 100;

/// Cap on how much the group's vocabulary can outweigh the base score
pub const MAX_PREFERENCE_WEIGHT: usize = 200;

/// Weight the corpus-relative base score always carries in the blend
pub const BASE_SCORE_WEIGHT: i64 = 200;

/// Generates one page of recipe recommendations for a group
///
/// Recipes are taken in corpus order and dropped when they are already used,
/// have no enabled category, have no enabled cuisine, or mention an excluded
/// ingredient. Survivors are scored against the group's word-score map,
/// blended with their base score, sorted by total descending (ties keep
/// corpus order) and paged `PAGE_SIZE` at a time, page `n` starting at 0.
/// Only the returned page is cloned out of the corpus.
pub fn recommend_recipes(
    word_scores: &WordScoreMap,
    options: &Options,
    used_sources: &HashSet<String>,
    n: usize,
    corpus: &[Recipe],
    tokenizer: &Tokenizer,
) -> Vec<Recipe> {
    if corpus.is_empty() {
        tracing::warn!("Recommendation requested against an empty corpus");
        return Vec::new();
    }

    let preference_weight = word_scores.len().min(MAX_PREFERENCE_WEIGHT) as i64;

    let mut retained: Vec<(&Recipe, Score)> = Vec::new();
    let mut skipped = SkipCounts::default();

    for recipe in corpus {
        if used_sources.contains(&recipe.url) {
            skipped.used += 1;
            continue;
        }
        if !Options::any_enabled(&options.category, &recipe.category) {
            skipped.category += 1;
            continue;
        }
        if !Options::any_enabled(&options.cuisine, &recipe.cuisine) {
            skipped.cuisine += 1;
            continue;
        }

        let words = tokenizer.get_words_all(recipe.text_fields());
        if Options::any_enabled(&options.excluded_ingredients, &words) {
            skipped.excluded += 1;
            continue;
        }

        let score = score_recipe(
            &words,
            word_scores,
            preference_weight,
            recipe.base_score,
            options,
        );
        retained.push((recipe, score));
    }

    tracing::debug!(
        corpus = corpus.len(),
        retained = retained.len(),
        skipped_used = skipped.used,
        skipped_category = skipped.category,
        skipped_cuisine = skipped.cuisine,
        skipped_excluded = skipped.excluded,
        "Filtered recipe corpus"
    );

    sort_by_total(&mut retained);
    paginate(retained, n)
        .into_iter()
        .map(|(recipe, score)| Recipe {
            score,
            ..recipe.clone()
        })
        .collect()
}

#[derive(Debug, Default)]
struct SkipCounts {
    used: usize,
    category: usize,
    cuisine: usize,
    excluded: usize,
}

/// Scores a recipe's words against the group's history
///
/// A word at position `j` of `len` words carries weight `len - j`, so earlier
/// words count for more. The resulting preference score is blended with the
/// base score; a recipe matching no history word keeps its base score as is.
fn score_recipe(
    words: &[String],
    word_scores: &WordScoreMap,
    preference_weight: i64,
    base_score: Score,
    options: &Options,
) -> Score {
    let total_words = words.len() as i64;
    let samples: Vec<ScoreWeight> = words
        .iter()
        .enumerate()
        .filter_map(|(j, word)| {
            word_scores
                .get(word)
                .map(|score| ScoreWeight::new(*score, total_words - j as i64))
        })
        .collect();

    let blended = if samples.is_empty() {
        base_score
    } else {
        let preference = average_score(&samples);
        average_score(&[
            ScoreWeight::new(preference, preference_weight),
            ScoreWeight::new(base_score, BASE_SCORE_WEIGHT),
        ])
    };

    blended.with_total(options)
}

/// Sorts by total, highest first; equal totals keep their relative order
fn sort_by_total(scored: &mut [(&Recipe, Score)]) {
    scored.sort_by(|(_, a), (_, b)| b.total.cmp(&a.total));
}

/// Returns page `n` of the sorted recommendations
///
/// Both bounds are clamped to `len - 1`, so the last page stops one short of
/// the end of the list.
fn paginate<T>(mut sorted: Vec<T>, n: usize) -> Vec<T> {
    if sorted.is_empty() {
        return Vec::new();
    }

    let last = sorted.len() - 1;
    let lower = n.saturating_mul(PAGE_SIZE).min(last);
    let upper = n.saturating_add(1).saturating_mul(PAGE_SIZE).min(last);

    sorted.truncate(upper);
    sorted.drain(..lower);
    sorted
}
