// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content analysis and analysis history.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{AnalysisResult, NewPost, Post};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Maximum content length, in characters.
pub const MAX_CONTENT_CHARS: u64 = 2000;

const DEFAULT_HISTORY_LIMIT: i64 = 10;
const MAX_HISTORY_LIMIT: i64 = 100;

/// Analysis routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/posts", get(list_posts))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

/// Analysis plus the caller's balance after the charge.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub credits_remaining: i32,
}

/// Analyze content for one credit.
///
/// The credit is taken only after the agent answers, with an atomic
/// conditional decrement; a caller racing itself to zero gets 402.
async fn analyze(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    body: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>> {
    let Json(request) = body.map_err(|e| {
        AppError::BadRequest(format!("Content is required and must be a string: {}", e.body_text()))
    })?;
    request.validate().map_err(|_| {
        AppError::BadRequest(format!(
            "Content must be between 1 and {} characters",
            MAX_CONTENT_CHARS
        ))
    })?;

    let user = caller.resolve(state.store.as_ref()).await?;
    if user.credits < 1 {
        return Err(AppError::InsufficientCredits);
    }

    let analysis = state.agent.analyze(&request.content).await;

    let Some(charged) = state.store.deduct_credit(&user.id).await? else {
        tracing::info!(user_id = %user.id, "Credits exhausted during analysis");
        return Err(AppError::InsufficientCredits);
    };

    state
        .store
        .save_post(NewPost {
            user_id: user.id.clone(),
            content: request.content,
            analysis: analysis.clone(),
        })
        .await?;

    tracing::info!(
        user_id = %user.id,
        virality = analysis.scores.virality,
        credits_remaining = charged.credits,
        "Content analyzed"
    );

    Ok(Json(AnalyzeResponse {
        analysis,
        credits_remaining: charged.credits,
    }))
}

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<i64>,
}

#[derive(Serialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
}

/// The caller's past analyses, newest first.
async fn list_posts(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<PostsResponse>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let Some(user) = state.store.get_user_by_auth_subject(&caller.subject).await? else {
        return Ok(Json(PostsResponse { posts: Vec::new() }));
    };

    let posts = state.store.get_user_posts(&user.id, limit).await?;
    Ok(Json(PostsResponse { posts }))
}
