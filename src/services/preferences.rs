use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    models::{average_score, Entry, Meal, Options, ScoreWeight, WordScoreMap},
    services::tokenizer::Tokenizer,
};

/// Builds the word-score map for one group's meal history
///
/// Every word of a meal's name collects that meal's score; each word then maps
/// to the equal-weighted average of everything it collected. Words absent from
/// the history are absent from the map.
pub fn build_word_score_map(
    meals: &[Meal],
    entries: &[Entry],
    options: &Options,
    tokenizer: &Tokenizer,
    now: DateTime<Utc>,
) -> WordScoreMap {
    let mut buckets: HashMap<String, Vec<ScoreWeight>> = HashMap::new();

    for meal in meals {
        let score = meal.score(entries, options, now);
        for word in tokenizer.get_words(&meal.name) {
            buckets
                .entry(word)
                .or_default()
                .push(ScoreWeight::new(score, 1));
        }
    }

    let word_scores: WordScoreMap = buckets
        .into_iter()
        .map(|(word, samples)| (word, average_score(&samples)))
        .collect();

    tracing::debug!(
        meals = meals.len(),
        entries = entries.len(),
        words = word_scores.len(),
        "Built word score map"
    );

    word_scores
}
