use std::collections::HashSet;
use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{Entry, Meal, Options, Recipe, WordScoreMap};
use crate::services::corpus::{load_corpus, source_for};
use crate::services::preferences::build_word_score_map;
use crate::services::recommendations::recommend_recipes;

use super::AppState;

// Request/Response types

/// Ranker input, as sent by the meal service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationRequest {
    pub word_score_map: WordScoreMap,
    pub options: Options,
    pub used_sources: HashSet<String>,
    pub n: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordScoreRequest {
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub options: Options,
    /// Reference time for recency; defaults to the time of the request
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecommendationRequest {
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub used_sources: HashSet<String>,
    #[serde(default)]
    pub n: usize,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub recipes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub recipes: usize,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        recipes: state.corpus.len(),
    })
}

/// Ranks the corpus against a prebuilt word-score map
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<Recipe>>> {
    tracing::info!(
        request_id = %request_id,
        words = request.word_score_map.len(),
        used_sources = request.used_sources.len(),
        page = request.n,
        "Processing recommendation request"
    );

    let recipes = rank_corpus(
        &state,
        request.word_score_map,
        request.options,
        request.used_sources,
        request.n,
    )
    .await?;

    tracing::info!(request_id = %request_id, returned = recipes.len(), "Recommendations ready");

    Ok(Json(recipes))
}

/// Builds the word-score map for a group's history
pub async fn word_scores(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<WordScoreRequest>,
) -> Json<WordScoreMap> {
    tracing::info!(
        request_id = %request_id,
        meals = request.meals.len(),
        entries = request.entries.len(),
        "Processing word score request"
    );

    let map = build_word_score_map(
        &request.meals,
        &request.entries,
        &request.options,
        &state.tokenizer,
        request.now.unwrap_or_else(Utc::now),
    );

    Json(map)
}

/// Aggregates a group's history and ranks the corpus against it
///
/// Recipes any of the meals were adopted from count as already used.
pub async fn recommend_for_meals(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<MealRecommendationRequest>,
) -> AppResult<Json<Vec<Recipe>>> {
    tracing::info!(
        request_id = %request_id,
        meals = request.meals.len(),
        entries = request.entries.len(),
        page = request.n,
        "Processing meal recommendation request"
    );

    let word_scores = build_word_score_map(
        &request.meals,
        &request.entries,
        &request.options,
        &state.tokenizer,
        request.now.unwrap_or_else(Utc::now),
    );

    let mut used_sources = request.used_sources;
    used_sources.extend(request.meals.iter().filter_map(|m| m.source.clone()));

    let words = word_scores.len();
    let recipes = rank_corpus(
        &state,
        word_scores,
        request.options,
        used_sources,
        request.n,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        words,
        returned = recipes.len(),
        "Recommendations ready"
    );

    Ok(Json(recipes))
}

/// Ranks the current corpus snapshot off the async worker threads
async fn rank_corpus(
    state: &AppState,
    word_scores: WordScoreMap,
    options: Options,
    used_sources: HashSet<String>,
    n: usize,
) -> AppResult<Vec<Recipe>> {
    let corpus = state.corpus.snapshot();
    let tokenizer = Arc::clone(&state.tokenizer);

    tokio::task::spawn_blocking(move || {
        recommend_recipes(&word_scores, &options, &used_sources, n, &corpus, &tokenizer)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Ranking task failed: {}", e)))
}

/// Reloads the corpus and swaps it in for subsequent requests
pub async fn reload_corpus(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ReloadResponse>> {
    if !state.config.allow_corpus_reload {
        return Err(AppError::Forbidden("Corpus reload is disabled".to_string()));
    }

    tracing::info!(
        request_id = %request_id,
        source = %state.config.recipes_source,
        "Reloading recipe corpus"
    );

    let source = source_for(&state.config.recipes_source);
    let corpus = load_corpus(source.as_ref()).await?;
    let recipes = corpus.len();
    state.corpus.replace(corpus);

    tracing::info!(request_id = %request_id, recipes, "Recipe corpus swapped");

    Ok(Json(ReloadResponse { recipes }))
}
