use axum::extract::{Query, State};
use axum::Json;
use rand::thread_rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{reshape_questions, LeaderboardEntry, Question, QuizMode};
use crate::provider::QuizQuery;
use crate::state::AppState;

/// All parameters arrive as text; a malformed limit falls back to the
/// mode's page size instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct QuizParams {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub mode: Option<String>,
    pub limit: Option<String>,
}

pub async fn get_quiz(
    State(state): State<AppState>,
    Query(params): Query<QuizParams>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let Some(provider) = state.provider.clone() else {
        return Err(ApiError::MissingApiKey);
    };

    let mode = QuizMode::parse(params.mode.as_deref());
    let query = QuizQuery {
        mode,
        category: params.category,
        difficulty: params.difficulty,
        limit: params.limit.as_deref().and_then(|v| v.parse().ok()),
    };

    let raw = provider.fetch_questions(&query).await.map_err(|err| {
        warn!("quiz fetch failed: {}", err);
        ApiError::Upstream(err.to_string())
    })?;

    let questions = reshape_questions(raw, &mut thread_rng());
    info!("served {} questions in {:?} mode", questions.len(), mode);
    Ok(Json(questions))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitScorePayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub score: u32,
}

pub async fn submit_score(
    State(state): State<AppState>,
    Json(payload): Json<SubmitScorePayload>,
) -> Result<Json<Value>, ApiError> {
    payload
        .validate()
        .map_err(|err| ApiError::InvalidPayload(err.to_string()))?;

    state
        .store
        .submit_score(&payload.name, &payload.email, payload.score)
        .await
        .map_err(|err| {
            warn!("score submit failed for {}: {}", payload.email, err);
            ApiError::Store(err.to_string())
        })?;

    info!("stored score {} for {}", payload.score, payload.email);
    Ok(Json(json!({})))
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub data: Vec<LeaderboardEntry>,
}

pub async fn get_leaderboard(State(state): State<AppState>) -> Json<LeaderboardResponse> {
    // entries ship unsorted, ranking is the client's job
    Json(LeaderboardResponse {
        data: state.store.leaderboard().await,
    })
}
