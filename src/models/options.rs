use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Option name mapped to whether it is enabled
pub type OptionSet = HashMap<String, bool>;

/// Per-request weighting and filter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Relative importance of each score component, typically 0-100
    pub cost_weight: i32,
    pub effort_weight: i32,
    pub healthiness_weight: i32,
    pub taste_weight: i32,
    pub recency_weight: i32,

    pub category: OptionSet,
    pub cuisine: OptionSet,
    pub source: OptionSet,
    /// Words that disqualify a recipe when enabled
    pub excluded_ingredients: OptionSet,

    /// Group accounts whose entries count towards meal scores
    pub users: OptionSet,
    /// People whose taste ratings count towards entry scores
    pub people: OptionSet,
}

impl Options {
    /// Whether any of `names` is present and enabled in `set`
    pub fn any_enabled<'a, I>(set: &OptionSet, names: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        names
            .into_iter()
            .any(|name| set.get(name).copied().unwrap_or(false))
    }

    /// Whether `name` passes an inclusion map; an empty map includes everyone
    pub fn includes(set: &OptionSet, name: &str) -> bool {
        set.is_empty() || set.get(name).copied().unwrap_or(false)
    }

    pub fn weight_sum(&self) -> i64 {
        [
            self.cost_weight,
            self.effort_weight,
            self.healthiness_weight,
            self.taste_weight,
            self.recency_weight,
        ]
        .iter()
        .map(|w| i64::from(*w))
        .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_camel_case_round_trip() {
        let json = r#"{
            "costWeight": 10,
            "effortWeight": 20,
            "healthinessWeight": 30,
            "tasteWeight": 40,
            "recencyWeight": 50,
            "category": {"Dinner": true, "Dessert": false},
            "cuisine": {"Thai": true},
            "source": {"Cooking": true},
            "excludedIngredients": {"peanut": true},
            "users": {"u1": true},
            "people": {"Alice": true, "Bob": false}
        }"#;

        let options: Options = serde_json::from_str(json).unwrap();
        assert_eq!(options.cost_weight, 10);
        assert_eq!(options.recency_weight, 50);
        assert_eq!(options.category.get("Dessert"), Some(&false));
        assert_eq!(options.excluded_ingredients.get("peanut"), Some(&true));
        assert_eq!(options.weight_sum(), 150);

        let json = serde_json::to_value(&options).unwrap();
        let back: Options = serde_json::from_value(json).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_options_missing_fields_default() {
        let options: Options = serde_json::from_str(r#"{"tasteWeight": 5}"#).unwrap();
        assert_eq!(options.taste_weight, 5);
        assert_eq!(options.cost_weight, 0);
        assert!(options.category.is_empty());
    }

    #[test]
    fn test_any_enabled() {
        let mut set = OptionSet::new();
        set.insert("Dinner".to_string(), true);
        set.insert("Lunch".to_string(), false);

        let tags = vec!["Lunch".to_string(), "Dinner".to_string()];
        assert!(Options::any_enabled(&set, &tags));
        assert!(!Options::any_enabled(&set, &vec!["Lunch".to_string()]));
        assert!(!Options::any_enabled(&set, &Vec::<String>::new()));
    }

    #[test]
    fn test_includes_empty_map_includes_all() {
        let mut set = OptionSet::new();
        assert!(Options::includes(&set, "anyone"));
        set.insert("Alice".to_string(), true);
        assert!(Options::includes(&set, "Alice"));
        assert!(!Options::includes(&set, "Bob"));
    }
}
