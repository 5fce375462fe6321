// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ranking and generation results from the ranker and generator agents.
//!
//! Every field has a serde default so a partially filled agent payload still
//! decodes into a complete value.

use serde::{Deserialize, Serialize};

/// Comparative ranking of several content pieces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingResult {
    pub rankings: Vec<Ranking>,
    pub comparison: Comparison,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ranking {
    pub rank: u32,
    pub content_id: String,
    pub overall_score: u32,
    pub breakdown: RankingBreakdown,
    pub strengths: Vec<String>,
    pub platform_fit: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingBreakdown {
    pub virality: u32,
    pub engagement: u32,
    pub reach: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comparison {
    pub top_performer: String,
    pub key_differentiators: Vec<String>,
    pub optimization_opportunities: Vec<String>,
}

impl RankingResult {
    /// Uniform ranking in input order, used when the agent cannot be consulted.
    ///
    /// `label` prefixes the content IDs (`mock`, `fallback`, `error`).
    pub fn placeholder(
        count: usize,
        label: &str,
        score_for: impl Fn(usize) -> u32,
        strengths: &[&str],
        platform_fit: &str,
        comparison: Comparison,
    ) -> Self {
        let rankings = (0..count)
            .map(|index| {
                let score = score_for(index);
                Ranking {
                    rank: index as u32 + 1,
                    content_id: format!("{}_{}", label, index),
                    overall_score: score,
                    breakdown: RankingBreakdown {
                        virality: score,
                        engagement: score,
                        reach: score,
                    },
                    strengths: strengths.iter().map(|s| s.to_string()).collect(),
                    platform_fit: platform_fit.to_string(),
                }
            })
            .collect();

        Self {
            rankings,
            comparison,
        }
    }
}

/// A generated post plus metadata about how it was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationResult {
    pub generated_content: GeneratedContent,
    pub metadata: GenerationMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub platform: String,
    pub content: String,
    pub hashtags: Vec<String>,
    pub trending_topics: Vec<String>,
    pub engagement_prediction: u32,
    pub trend_sources: Vec<String>,
    pub publish_suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationMetadata {
    /// RFC3339 timestamp
    pub generation_time: String,
    pub trend_freshness: u32,
    pub data_sources: Vec<String>,
    pub confidence_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ranking_payload_fills_defaults() {
        let parsed: RankingResult = serde_json::from_str(
            r#"{"rankings":[{"rank":1,"content_id":"a","overall_score":88}]}"#,
        )
        .unwrap();

        assert_eq!(parsed.rankings.len(), 1);
        assert_eq!(parsed.rankings[0].overall_score, 88);
        assert_eq!(parsed.rankings[0].breakdown, RankingBreakdown::default());
        assert!(parsed.comparison.top_performer.is_empty());
    }

    #[test]
    fn test_placeholder_ranking_orders_inputs() {
        let result = RankingResult::placeholder(
            3,
            "fallback",
            |i| 75u32.saturating_sub(i as u32 * 10),
            &["Fallback ranking"],
            "General",
            Comparison::default(),
        );
        assert_eq!(result.rankings[2].rank, 3);
        assert_eq!(result.rankings[2].content_id, "fallback_2");
        assert_eq!(result.rankings[2].overall_score, 55);
    }
}
