// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stored snapshot of one analyzed submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::{AnalysisResult, Suggestion};

/// Post row. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub virality_score: Option<i32>,
    pub hook_score: Option<i32>,
    pub clarity_score: Option<i32>,
    pub breadth_score: Option<i32>,
    pub tension_score: Option<i32>,
    pub reply_score: Option<i32>,
    pub target_age: Option<String>,
    pub target_profession: Option<String>,
    pub target_interests: Option<Vec<String>>,
    pub target_sentiment: Option<String>,
    pub controversiality: Option<String>,
    pub suggestions: Option<Vec<Suggestion>>,
    pub created_at: DateTime<Utc>,
}

/// Fields written when a post is stored.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: String,
    pub content: String,
    pub analysis: AnalysisResult,
}

impl NewPost {
    /// Materialize the stored row with the given identity.
    pub fn into_post(self, id: String, created_at: DateTime<Utc>) -> Post {
        let scores = self.analysis.scores;
        let target = self.analysis.target_group;
        Post {
            id,
            user_id: self.user_id,
            content: self.content,
            virality_score: Some(scores.virality.into()),
            hook_score: Some(scores.hook.into()),
            clarity_score: Some(scores.clarity.into()),
            breadth_score: Some(scores.breadth.into()),
            tension_score: Some(scores.tension.into()),
            reply_score: Some(scores.reply.into()),
            target_age: Some(target.age),
            target_profession: Some(target.profession),
            target_interests: Some(target.interests),
            target_sentiment: Some(target.sentiment),
            controversiality: Some(self.analysis.controversiality.as_str().to_string()),
            suggestions: Some(self.analysis.suggestions),
            created_at,
        }
    }
}
