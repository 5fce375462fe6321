// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community trending-topic ideas shown in the daily feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Author label for generated and unattributed ideas.
pub const COMMUNITY_AUTHOR: &str = "Community Trend";

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyIdea {
    pub id: String,
    pub content: String,
    pub author_name: String,
    pub category: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    /// Relative age ("2h"), derived at response time
    #[serde(rename = "timeAgo", skip_serializing_if = "Option::is_none", default)]
    pub time_ago: Option<String>,
}

/// Fields written when an idea is stored.
#[derive(Debug, Clone)]
pub struct NewDailyIdea {
    pub content: String,
    pub author_name: String,
    pub category: Option<String>,
}

impl NewDailyIdea {
    pub fn new(content: impl Into<String>, author_name: Option<String>, category: Option<String>) -> Self {
        Self {
            content: content.into(),
            author_name: author_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| COMMUNITY_AUTHOR.to_string()),
            category,
        }
    }
}
