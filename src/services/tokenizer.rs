use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Characters that end a word by default
pub const DEFAULT_SEPARATORS: &str = " \t\n\r\u{a0},.;:!?-()[]{}/\\\"'&*+=<>|~`#%^@$_";

/// Words dropped by default: number words, filler words and HTML leftovers
/// from scraped ingredient text
pub const DEFAULT_STOPWORDS: &[&str] = &[
    // numbers
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "half", "quarter", "dozen",
    // filler
    "a", "an", "the", "and", "or", "of", "to", "in", "with", "for", "on", "at", "by", "from",
    "into",
    // html
    "nbsp", "amp", "quot", "lt", "gt", "39", "x27",
];

/// Splits free text into words
///
/// Built once from configuration and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    separators: HashSet<char>,
    stopwords: HashSet<String>,
}

/// On-disk tokenizer configuration
#[derive(Debug, Deserialize)]
struct TokenizerFile {
    separators: String,
    #[serde(default)]
    stopwords: Vec<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATORS.chars(), DEFAULT_STOPWORDS.iter().copied())
    }
}

impl Tokenizer {
    pub fn new<S, W>(separators: S, stopwords: W) -> Self
    where
        S: IntoIterator<Item = char>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        Self {
            separators: separators.into_iter().collect(),
            stopwords: stopwords
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Loads separators and stopwords from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let file: TokenizerFile = serde_json::from_str(&raw)?;

        if file.separators.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Tokenizer config {} has no separators",
                path.as_ref().display()
            )));
        }

        tracing::info!(
            path = %path.as_ref().display(),
            separators = file.separators.chars().count(),
            stopwords = file.stopwords.len(),
            "Loaded tokenizer config"
        );

        Ok(Self::new(file.separators.chars(), file.stopwords))
    }

    /// Splits `text` into words, in order, duplicates kept
    ///
    /// Runs of non-separator characters form words. Stopwords are dropped
    /// (compared case-insensitively); every other word keeps its case.
    pub fn get_words(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut current = String::new();

        for c in text.chars() {
            if self.separators.contains(&c) {
                self.flush(&mut current, &mut words);
            } else {
                current.push(c);
            }
        }
        self.flush(&mut current, &mut words);

        words
    }

    /// Words of several text fields, concatenated in field order
    pub fn get_words_all<'a, I>(&self, texts: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts
            .into_iter()
            .flat_map(|text| self.get_words(text))
            .collect()
    }

    fn flush(&self, current: &mut String, words: &mut Vec<String>) {
        if current.is_empty() {
            return;
        }
        let word = std::mem::take(current);
        if !self.is_stopword(&word) {
            words.push(word);
        }
    }

    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }
}
