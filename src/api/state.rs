use std::sync::Arc;

use crate::config::Config;
use crate::models::Recipes;
use crate::services::corpus::{load_corpus, source_for, CorpusHandle};
use crate::services::tokenizer::Tokenizer;

/// Shared application state
///
/// The corpus is read-only once loaded; `corpus` only ever has whole
/// snapshots swapped in.
#[derive(Clone)]
pub struct AppState {
    pub corpus: CorpusHandle,
    pub tokenizer: Arc<Tokenizer>,
    pub config: Arc<Config>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default(), Tokenizer::default(), Arc::new(Vec::new()))
    }
}

impl AppState {
    pub fn new(config: Config, tokenizer: Tokenizer, corpus: Arc<Recipes>) -> Self {
        Self {
            corpus: CorpusHandle::new(corpus),
            tokenizer: Arc::new(tokenizer),
            config: Arc::new(config),
        }
    }

    /// Builds state around an already-normalized corpus with default settings
    pub fn with_corpus(corpus: Recipes) -> Self {
        Self::new(Config::default(), Tokenizer::default(), Arc::new(corpus))
    }

    /// Loads tokenizer settings and the normalized corpus named by `config`
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let tokenizer = match config.tokenizer_config.as_deref() {
            Some(path) => Tokenizer::from_file(path)?,
            None => Tokenizer::default(),
        };

        let source = source_for(&config.recipes_source);
        let corpus = load_corpus(source.as_ref()).await?;

        Ok(Self::new(config, tokenizer, corpus))
    }
}
