// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily ideas feed.

use crate::error::{AppError, Result};
use crate::models::idea::COMMUNITY_AUTHOR;
use crate::models::{DailyIdea, NewDailyIdea};
use crate::time_utils::time_ago;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;
/// Ideas requested from the agent when the feed is regenerated.
const REGENERATE_COUNT: usize = 10;

/// Feed routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/daily-ideas", get(list_ideas).post(create_idea))
}

#[derive(Deserialize)]
struct IdeasQuery {
    limit: Option<i64>,
    #[serde(default)]
    refresh: Option<String>,
}

#[derive(Serialize)]
pub struct IdeasResponse {
    pub ideas: Vec<DailyIdea>,
}

#[derive(Serialize)]
pub struct IdeaResponse {
    pub idea: DailyIdea,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIdeaRequest {
    content: Option<String>,
    author_name: Option<String>,
    category: Option<String>,
}

/// List ideas, regenerating the feed first when it is empty or a refresh is requested.
async fn list_ideas(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdeasQuery>,
) -> Result<Json<IdeasResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let refresh = query.refresh.as_deref() == Some("true");

    let mut ideas = state.store.get_daily_ideas(limit).await?;

    if ideas.is_empty() || refresh {
        tracing::info!(refresh, "Generating new daily ideas");
        let generated = state.agent.generate_ideas(REGENERATE_COUNT).await;
        for idea in generated {
            state
                .store
                .create_daily_idea(NewDailyIdea::new(
                    idea.content,
                    Some(COMMUNITY_AUTHOR.to_string()),
                    idea.category,
                ))
                .await?;
        }
        ideas = state.store.get_daily_ideas(limit).await?;
    }

    let now = Utc::now();
    for idea in &mut ideas {
        idea.time_ago = Some(time_ago(idea.created_at, now));
    }

    Ok(Json(IdeasResponse { ideas }))
}

/// Add a community idea to the feed.
async fn create_idea(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<CreateIdeaRequest>, JsonRejection>,
) -> Result<Json<IdeaResponse>> {
    let invalid = || AppError::BadRequest("Content is required and must be a string".to_string());

    let Json(request) = body.map_err(|_| invalid())?;
    let content = request
        .content
        .filter(|c| !c.is_empty())
        .ok_or_else(invalid)?;

    let idea = state
        .store
        .create_daily_idea(NewDailyIdea::new(content, request.author_name, request.category))
        .await?;

    tracing::info!(idea_id = %idea.id, "Daily idea created");
    Ok(Json(IdeaResponse { idea }))
}
