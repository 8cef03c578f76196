use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{average_score, Options, Score, ScoreWeight};

/// Days without eating a meal after which its recency score saturates
pub const RECENCY_HORIZON_DAYS: i64 = 30;

/// A meal in a group's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub cuisine: Vec<String>,
    /// Recipe URL the meal was adopted from, if any
    #[serde(default)]
    pub source: Option<String>,
}

/// One person's taste rating within an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRating {
    pub person: String,
    pub taste: i32,
}

/// One historical instance of eating a meal
///
/// `cost` and `effort` are stored raw, higher meaning more costly or
/// effortful; scoring inverts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub meal_id: Uuid,
    pub date: DateTime<Utc>,
    /// Group account that recorded the entry
    #[serde(default)]
    pub user: String,
    /// How the meal was obtained (cooking, takeout, ...)
    #[serde(default)]
    pub source: String,
    pub cost: i32,
    pub effort: i32,
    pub healthiness: i32,
    #[serde(default)]
    pub taste: Vec<PersonRating>,
}

impl Entry {
    /// Scores this entry with all components oriented higher-is-better
    ///
    /// Only ratings from people enabled in `options.people` count. Recency is
    /// meal-level and left at 0 here.
    pub fn score(&self, options: &Options) -> Score {
        let ratings: Vec<i64> = self
            .taste
            .iter()
            .filter(|r| Options::includes(&options.people, &r.person))
            .map(|r| i64::from(r.taste))
            .collect();

        let taste = if ratings.is_empty() {
            0
        } else {
            (ratings.iter().sum::<i64>() / ratings.len() as i64) as i32
        };

        Score {
            taste,
            cost: 100 - self.cost.clamp(0, 100),
            effort: 100 - self.effort.clamp(0, 100),
            healthiness: self.healthiness,
            recency: 0,
            total: 0,
        }
        .clamped()
        .with_total(options)
    }
}

impl Meal {
    /// Scores the meal from its entries as of `now`
    ///
    /// Entries for other meals, or recorded by users disabled in
    /// `options.users`, are ignored. Rated components are the equal-weighted
    /// average of the remaining entry scores; recency grows with the days
    /// since the latest of them.
    pub fn score(&self, entries: &[Entry], options: &Options, now: DateTime<Utc>) -> Score {
        let own: Vec<&Entry> = entries
            .iter()
            .filter(|e| e.meal_id == self.id)
            .filter(|e| Options::includes(&options.users, &e.user))
            .collect();

        let samples: Vec<ScoreWeight> = own
            .iter()
            .map(|e| ScoreWeight::new(e.score(options), 1))
            .collect();
        let mut score = average_score(&samples);

        score.recency = match own.iter().map(|e| e.date).max() {
            Some(latest) => {
                let days = (now - latest).num_days().max(0);
                (days * 100 / RECENCY_HORIZON_DAYS).min(100) as i32
            }
            None => 100,
        };

        score.clamped().with_total(options)
    }
}
