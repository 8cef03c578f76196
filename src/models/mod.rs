mod meal;
mod options;
mod recipe;
mod score;

pub use meal::{Entry, Meal, PersonRating, RECENCY_HORIZON_DAYS};
pub use options::{OptionSet, Options};
pub use recipe::{BaseScoreIndex, Nutrition, Recipe, Recipes, DEFAULT_TOTAL_MINUTES};
pub use score::{average_score, Score, ScoreWeight};

use std::collections::HashMap;

/// Word mapped to the average score of the historical meals using it
pub type WordScoreMap = HashMap<String, Score>;
