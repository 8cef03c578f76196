use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::{
    error::{AppError, AppResult},
    models::{Recipe, Recipes},
    services::normalizer::compute_base_scores,
};

/// Where a recipe corpus snapshot comes from
///
/// Snapshots are JSON arrays of recipes as scraped, without base scores.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecipeSource: Send + Sync {
    /// Reads every recipe in the snapshot, in order
    async fn load(&self) -> AppResult<Vec<Recipe>>;

    /// Human readable location for logging
    fn describe(&self) -> String;
}

/// Snapshot stored on the local filesystem
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl RecipeSource for FileSource {
    async fn load(&self) -> AppResult<Vec<Recipe>> {
        let raw = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Snapshot served over HTTP
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl RecipeSource for HttpSource {
    async fn load(&self) -> AppResult<Vec<Recipe>> {
        let recipes = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Recipe>>()
            .await?;
        Ok(recipes)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Picks the source implementation for a configured location
pub fn source_for(location: &str) -> Box<dyn RecipeSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// Loads a snapshot and normalizes it into a read-only corpus
///
/// Normalization runs on the blocking pool so a reload does not stall the
/// async workers.
pub async fn load_corpus(source: &dyn RecipeSource) -> AppResult<Arc<Recipes>> {
    let start = Instant::now();
    let mut recipes = source.load().await?;

    tracing::info!(
        source = %source.describe(),
        recipes = recipes.len(),
        "Loaded recipe snapshot"
    );

    let recipes = tokio::task::spawn_blocking(move || {
        compute_base_scores(&mut recipes);
        recipes
    })
    .await
    .map_err(|e| AppError::Internal(format!("Normalization task failed: {}", e)))?;

    tracing::info!(
        recipes = recipes.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Recipe corpus ready"
    );

    Ok(Arc::new(recipes))
}

/// Shared handle to the current corpus snapshot
///
/// Readers take an `Arc` to the snapshot and iterate it without holding any
/// lock. A refresh builds a complete new snapshot first and then swaps the
/// pointer; requests already running keep the snapshot they started with.
#[derive(Clone, Debug, Default)]
pub struct CorpusHandle {
    current: Arc<RwLock<Arc<Recipes>>>,
}

impl CorpusHandle {
    pub fn new(recipes: Arc<Recipes>) -> Self {
        Self {
            current: Arc::new(RwLock::new(recipes)),
        }
    }

    /// The snapshot visible to new requests
    pub fn snapshot(&self) -> Arc<Recipes> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Makes `recipes` the snapshot for all later requests
    pub fn replace(&self, recipes: Arc<Recipes>) {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = recipes;
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
