use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Score;

/// Minutes assumed when a recipe carries no total time
pub const DEFAULT_TOTAL_MINUTES: i64 = 60;

/// A scraped external recipe
///
/// `url` is the unique identifier. `base_score_index` and `base_score` are
/// filled in by the corpus normalizer; `score` is filled in per request by the
/// ranker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub name: String,
    pub url: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub category: Vec<String>,
    pub cuisine: Vec<String>,
    pub nutrition: Nutrition,
    pub rating_value: f64,
    pub rating_count: i64,
    pub date_published: Option<DateTime<Utc>>,
    pub date_modified: Option<DateTime<Utc>>,
    /// ISO 8601 duration as scraped, e.g. `PT1H30M`
    pub total_time: Option<String>,
    pub base_score_index: BaseScoreIndex,
    pub base_score: Score,
    pub score: Score,
}

/// The full corpus, in load order
pub type Recipes = Vec<Recipe>;

/// Nutrition facts as scraped, amounts with units (`"12 g"`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Nutrition {
    pub calories: Option<String>,
    pub carbohydrate_content: Option<String>,
    pub fat_content: Option<String>,
    pub fiber_content: Option<String>,
    pub protein_content: Option<String>,
    pub sodium_content: Option<String>,
    pub sugar_content: Option<String>,
}

/// Raw per-recipe signals before percentile normalization
///
/// Cost, effort and healthiness are higher-is-worse; taste and recency are
/// higher-is-better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseScoreIndex {
    pub cost: f64,
    pub effort: f64,
    pub healthiness: f64,
    pub taste: f64,
    pub recency: f64,
}

impl Recipe {
    /// Name, description and each ingredient line, in that order
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.description.as_str()]
            .into_iter()
            .chain(self.ingredients.iter().map(String::as_str))
    }

    /// Total time in whole minutes
    ///
    /// Absent: [`DEFAULT_TOTAL_MINUTES`]. Unparseable: 0.
    pub fn total_minutes(&self) -> i64 {
        match self.total_time.as_deref() {
            None => DEFAULT_TOTAL_MINUTES,
            Some(raw) => match parse_iso_duration_minutes(raw) {
                Some(minutes) => minutes.floor() as i64,
                None => {
                    tracing::debug!(url = %self.url, total_time = %raw, "Unparseable total time");
                    0
                }
            },
        }
    }
}

impl Nutrition {
    pub fn sugar_grams(&self) -> f64 {
        self.sugar_content.as_deref().and_then(parse_grams).unwrap_or(0.0)
    }

    pub fn protein_grams(&self) -> f64 {
        self.protein_content.as_deref().and_then(parse_grams).unwrap_or(0.0)
    }
}

/// Parses an ISO 8601 duration (`P1DT2H30M`) into minutes
pub fn parse_iso_duration_minutes(raw: &str) -> Option<f64> {
    let rest = raw.trim().strip_prefix(['P', 'p'])?;

    let mut minutes = 0.0;
    let mut in_time = false;
    let mut number = String::new();
    let mut seen_component = false;

    for c in rest.chars().map(|c| c.to_ascii_uppercase()) {
        match c {
            'T' => {
                if in_time || !number.is_empty() {
                    return None;
                }
                in_time = true;
            }
            '0'..='9' | '.' | ',' => number.push(if c == ',' { '.' } else { c }),
            unit => {
                let value: f64 = number.parse().ok()?;
                number.clear();
                let factor = match (in_time, unit) {
                    (false, 'Y') => 365.0 * 24.0 * 60.0,
                    (false, 'M') => 30.0 * 24.0 * 60.0,
                    (false, 'W') => 7.0 * 24.0 * 60.0,
                    (false, 'D') => 24.0 * 60.0,
                    (true, 'H') => 60.0,
                    (true, 'M') => 1.0,
                    (true, 'S') => 1.0 / 60.0,
                    _ => return None,
                };
                minutes += value * factor;
                seen_component = true;
            }
        }
    }

    if !number.is_empty() || !seen_component {
        return None;
    }
    Some(minutes)
}

/// Parses a leading amount from a nutrition string, in grams
fn parse_grams(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let end = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(raw.len());
    let value: f64 = raw[..end].replace(',', "").parse().ok()?;

    let unit = raw[end..].trim_start().to_ascii_lowercase();
    if unit.starts_with("mg") {
        Some(value / 1000.0)
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_iso_duration() {
        assert_eq!(parse_iso_duration_minutes("PT45M"), Some(45.0));
        assert_eq!(parse_iso_duration_minutes("PT1H30M"), Some(90.0));
        assert_eq!(parse_iso_duration_minutes("P1DT2H"), Some(1560.0));
        assert_eq!(parse_iso_duration_minutes("PT90S"), Some(1.5));
        assert_eq!(parse_iso_duration_minutes("pt20m"), Some(20.0));
    }

    #[test]
    fn test_parse_iso_duration_rejects_garbage() {
        assert_eq!(parse_iso_duration_minutes(""), None);
        assert_eq!(parse_iso_duration_minutes("P"), None);
        assert_eq!(parse_iso_duration_minutes("PT"), None);
        assert_eq!(parse_iso_duration_minutes("45 minutes"), None);
        assert_eq!(parse_iso_duration_minutes("PT5H3"), None);
        assert_eq!(parse_iso_duration_minutes("P2H"), None);
    }

    #[test]
    fn test_total_minutes_defaults() {
        let mut recipe = Recipe::default();
        assert_eq!(recipe.total_minutes(), DEFAULT_TOTAL_MINUTES);

        recipe.total_time = Some("about an hour".to_string());
        assert_eq!(recipe.total_minutes(), 0);

        recipe.total_time = Some("PT1H15M".to_string());
        assert_eq!(recipe.total_minutes(), 75);
    }

    #[test]
    fn test_nutrition_grams() {
        let nutrition = Nutrition {
            sugar_content: Some("12.5 g".to_string()),
            protein_content: Some("1,200 mg".to_string()),
            ..Default::default()
        };
        assert_eq!(nutrition.sugar_grams(), 12.5);
        assert_eq!(nutrition.protein_grams(), 1.2);
        assert_eq!(Nutrition::default().sugar_grams(), 0.0);

        let bad = Nutrition {
            sugar_content: Some("lots".to_string()),
            ..Default::default()
        };
        assert_eq!(bad.sugar_grams(), 0.0);
    }

    #[test]
    fn test_text_fields_order() {
        let recipe = Recipe {
            name: "Pad Thai".to_string(),
            description: "Noodles".to_string(),
            ingredients: vec!["rice noodles".to_string(), "peanuts".to_string()],
            ..Default::default()
        };
        let fields: Vec<&str> = recipe.text_fields().collect();
        assert_eq!(fields, vec!["Pad Thai", "Noodles", "rice noodles", "peanuts"]);
    }

    #[test]
    fn test_recipe_round_trip() {
        let recipe = Recipe {
            name: "Green Curry".to_string(),
            url: "http://x/green-curry".to_string(),
            description: "Fragrant and spicy".to_string(),
            ingredients: vec!["coconut milk".to_string(), "chicken".to_string()],
            category: vec!["Dinner".to_string()],
            cuisine: vec!["Thai".to_string()],
            nutrition: Nutrition {
                sugar_content: Some("4 g".to_string()),
                protein_content: Some("31 g".to_string()),
                ..Default::default()
            },
            rating_value: 4.73,
            rating_count: 1289,
            date_published: Some(Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()),
            date_modified: Some(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap()),
            total_time: Some("PT40M".to_string()),
            base_score_index: BaseScoreIndex {
                cost: 2.0,
                effort: 42.0,
                healthiness: 12.903225806451612,
                taste: 973.0,
                recency: 1.0e6,
            },
            base_score: Score {
                taste: 91,
                cost: 88,
                effort: 70,
                healthiness: 64,
                recency: 12,
                total: 65,
            },
            score: Score {
                taste: 80,
                cost: 77,
                effort: 66,
                healthiness: 55,
                recency: 44,
                total: 63,
            },
        };

        let json = serde_json::to_string(&recipe).unwrap();
        assert!(json.contains("\"baseScore\""));
        assert!(json.contains("\"baseScoreIndex\""));
        assert!(json.contains("\"ratingValue\""));

        let back: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recipe);
    }
}
