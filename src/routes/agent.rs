// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ranking and generation passthrough to the inference agents.

use crate::error::{AppError, Result};
use crate::models::{GenerationResult, RankingResult};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Agent routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rank", post(rank))
        .route("/api/generate", post(generate))
}

#[derive(Debug, Deserialize, Validate)]
struct RankRequest {
    #[validate(length(min = 1, max = 10))]
    contents: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
struct GenerateRequest {
    #[validate(length(min = 1, max = 2000))]
    prompt: String,
}

/// Compare several drafts.
async fn rank(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<RankingResult>> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    request
        .validate()
        .map_err(|_| AppError::BadRequest("Provide between 1 and 10 contents".to_string()))?;

    Ok(Json(state.agent.rank(&request.contents).await))
}

/// Draft a post from a prompt.
async fn generate(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    request
        .validate()
        .map_err(|_| AppError::BadRequest("Prompt must be 1-2000 characters".to_string()))?;

    Ok(Json(state.agent.generate(&request.prompt).await))
}
