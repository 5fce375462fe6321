// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the hosted inference agents (analyzer, ranker, generator) and
//! the trending-ideas endpoint.
//!
//! Every public operation is infallible from the caller's point of view:
//! offline mode, a missing key, transport errors, non-2xx statuses and
//! malformed payloads all degrade to mock data, logged but never surfaced.
//! One POST per call, no retries.

use crate::config::AgentConfig;
use crate::models::generation::{
    Comparison, GeneratedContent, GenerationMetadata, Ranking, RankingBreakdown,
};
use crate::models::idea::COMMUNITY_AUTHOR;
use crate::models::{AnalysisResult, DailyIdea, GenerationResult, RankingResult};
use crate::services::normalize::normalize_analysis;
use crate::time_utils::{format_utc_rfc3339, time_ago};
use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const TRENDING_COMMUNITIES: [&str; 5] = ["tech", "programming", "startups", "ai", "productivity"];

/// Errors from a single agent round trip. Never leaves this module.
#[derive(Debug, thiserror::Error)]
enum AgentError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Chat inference request body.
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    user_id: &'a str,
    agent_id: &'a str,
    session_id: String,
    message: String,
}

/// Trending-ideas request body.
#[derive(Debug, Serialize)]
struct TrendingRequest {
    count: usize,
    platform: &'static str,
    communities: [&'static str; 5],
    timeframe: &'static str,
    min_engagement: u32,
    model: &'static str,
    include_metrics: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TrendingResponse {
    trends: Option<Vec<Value>>,
}

/// Inference agent client.
#[derive(Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    config: AgentConfig,
}

impl AgentClient {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Whether calls go to the network (key configured and not offline).
    pub fn is_live(&self) -> bool {
        self.config.is_live()
    }

    /// Score content for virality and propose improvements.
    pub async fn analyze(&self, content: &str) -> AnalysisResult {
        if !self.is_live() {
            tracing::debug!("Agent offline - using mock analysis");
            return AnalysisResult::mock();
        }

        let message = format!(
            "Analyze this social media content for virality, engagement, and audience insights. \
             Provide scores (0-100) for: virality, hook, clarity, breadth, tension, and reply potential. \
             Also identify target audience (age, profession, interests, sentiment), controversiality level, \
             and 5 specific improvement suggestions with impact estimates. Content: \"{}\"",
            content
        );

        match self.infer(&self.config.analyzer_agent_id, message).await {
            Ok(envelope) => normalize_analysis(&envelope, &mut rand::rng()),
            Err(e) => {
                tracing::error!(error = %e, "Content analyzer call failed; falling back to mock analysis");
                AnalysisResult::randomized_mock(&mut rand::rng())
            }
        }
    }

    /// Rank several content pieces by performance potential.
    pub async fn rank(&self, contents: &[String]) -> RankingResult {
        if !self.is_live() {
            tracing::debug!("Agent offline - using mock ranking");
            return mock_ranking(contents.len(), &mut rand::rng());
        }

        let list = contents
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}. \"{}\"", i + 1, c))
            .collect::<Vec<_>>()
            .join("\n");
        let message = format!(
            "Rank and compare these content pieces by performance potential:\n{}",
            list
        );

        let envelope = match self.infer(&self.config.ranker_agent_id, message).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "Content ranker call failed");
                return RankingResult::placeholder(
                    contents.len(),
                    "error",
                    |_| 50,
                    &["Error fallback"],
                    "Unknown",
                    Comparison {
                        top_performer: "error_0".to_string(),
                        key_differentiators: vec!["Error occurred".to_string()],
                        optimization_opportunities: vec!["Retry analysis".to_string()],
                    },
                );
            }
        };

        let text = envelope_text(&envelope);
        match parse_embedded::<RankingResult>(&text, &["rankings", "comparison"]) {
            Some(result) => result,
            None => {
                tracing::warn!("Could not parse ranker response; using fallback ranking");
                RankingResult::placeholder(
                    contents.len(),
                    "fallback",
                    |i| 75u32.saturating_sub(i as u32 * 10),
                    &["Fallback ranking"],
                    "General",
                    Comparison {
                        top_performer: "fallback_0".to_string(),
                        key_differentiators: vec!["Fallback analysis".to_string()],
                        optimization_opportunities: vec!["Fallback suggestions".to_string()],
                    },
                )
            }
        }
    }

    /// Generate a post from a free-text prompt.
    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        if !self.is_live() {
            tracing::debug!("Agent offline - using mock generation");
            return mock_generation();
        }

        let message = format!(
            "Generate engaging social media content based on this prompt: \"{}\". \
             Include current trends and make it optimized for maximum engagement.",
            prompt
        );

        let envelope = match self.infer(&self.config.generator_agent_id, message).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "Content generator call failed");
                return generation_fallback(
                    "Error generating content. Please try again.",
                    &["#Error"],
                    &[],
                    0,
                    &[],
                    "Retry generation",
                    0,
                    &["Error"],
                    0,
                );
            }
        };

        let text = envelope_text(&envelope);
        match parse_embedded::<GenerationResult>(&text, &["generated_content"]) {
            Some(result) => result,
            None => {
                tracing::warn!("Could not parse generator response; wrapping raw text");
                let content = if text.trim().is_empty() {
                    "Generated content placeholder"
                } else {
                    text.as_str()
                };
                generation_fallback(
                    content,
                    &["#Content", "#SocialMedia"],
                    &["Current trends"],
                    70,
                    &["AI Generation"],
                    "Test and optimize based on audience response",
                    1,
                    &["AI Model"],
                    70,
                )
            }
        }
    }

    /// Fetch trending post ideas for the daily feed.
    pub async fn generate_ideas(&self, count: usize) -> Vec<DailyIdea> {
        if !self.is_live() {
            if !self.config.mock_latency.is_zero() {
                tokio::time::sleep(self.config.mock_latency).await;
            }
            return mock_trending_ideas(Utc::now(), count);
        }

        match self.fetch_trending(count).await {
            Ok(response) => match response.trends {
                Some(trends) => transform_trends(&trends, Utc::now(), &mut rand::rng()),
                None => {
                    tracing::warn!("Trending response had no trends; using mock ideas");
                    mock_trending_ideas(Utc::now(), count)
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Error fetching trending ideas");
                mock_trending_ideas(Utc::now(), count)
            }
        }
    }

    async fn fetch_trending(&self, count: usize) -> Result<TrendingResponse, AgentError> {
        let url = format!(
            "{}/sonar/trending-tweets",
            self.config.api_base.trim_end_matches('/')
        );
        let body = TrendingRequest {
            count,
            platform: "twitter",
            communities: TRENDING_COMMUNITIES,
            timeframe: "24h",
            min_engagement: 100,
            model: "sonar-pro",
            include_metrics: true,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .json(&body)
            .send()
            .await?;

        Ok(check_response(response).await?.json().await?)
    }

    /// POST one message to an agent and return the decoded JSON envelope.
    async fn infer(&self, agent_id: &str, message: String) -> Result<Value, AgentError> {
        let request = InferenceRequest {
            user_id: &self.config.user_id,
            agent_id,
            session_id: session_id(agent_id),
            message,
        };

        tracing::debug!(agent_id, session_id = %request.session_id, "Calling inference agent");

        let response = self
            .http
            .post(&self.config.inference_url)
            .header("x-api-key", self.config.api_key.as_deref().unwrap_or_default())
            .json(&request)
            .send()
            .await?;

        Ok(check_response(response).await?.json().await?)
    }
}

/// Pass through 2xx responses, turn anything else into an error.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AgentError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AgentError::Status { status, body })
}

/// Correlation token for one agent call: `<agent>-<millis>-<suffix>`.
pub fn session_id(agent_id: &str) -> String {
    format!(
        "{}-{}-{}",
        agent_id,
        Utc::now().timestamp_millis(),
        random_base36(9)
    )
}

/// Random lowercase alphanumeric string.
pub fn random_base36(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// The agent's answer text: `response`, else `message`, else empty.
fn envelope_text(envelope: &Value) -> String {
    ["response", "message"]
        .iter()
        .filter_map(|key| envelope.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(_) => Some(value.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Parse the text as JSON, or failing that the `{...}` span inside it.
///
/// Only an object carrying at least one of `keys` at the top level is
/// accepted, so braces in ordinary prose (`fn main() {}`) are not mistaken
/// for an answer.
fn parse_embedded<T: serde::de::DeserializeOwned>(text: &str, keys: &[&str]) -> Option<T> {
    let accept = |candidate: &str| -> Option<T> {
        let value: Value = serde_json::from_str(candidate).ok()?;
        let fields = value.as_object()?;
        if !keys.iter().any(|key| fields.contains_key(*key)) {
            return None;
        }
        serde_json::from_value(value).ok()
    };

    accept(text.trim()).or_else(|| {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if start > end {
            return None;
        }
        accept(&text[start..=end])
    })
}

fn mock_ranking<R: Rng>(count: usize, rng: &mut R) -> RankingResult {
    let rankings = (0..count)
        .map(|index| Ranking {
            rank: index as u32 + 1,
            content_id: format!("mock_{}", index),
            overall_score: rng.random_range(60..100),
            breakdown: RankingBreakdown {
                virality: rng.random_range(60..100),
                engagement: rng.random_range(60..100),
                reach: rng.random_range(60..100),
            },
            strengths: vec!["Good structure".to_string(), "Clear message".to_string()],
            platform_fit: "Twitter".to_string(),
        })
        .collect();

    RankingResult {
        rankings,
        comparison: Comparison {
            top_performer: "mock_0".to_string(),
            key_differentiators: vec!["Better hook".to_string(), "Clearer message".to_string()],
            optimization_opportunities: vec![
                "Add more tension".to_string(),
                "Include call to action".to_string(),
            ],
        },
    }
}

fn mock_generation() -> GenerationResult {
    generation_fallback(
        "This is a mock generated post about trending topics in tech and AI.",
        &["#AI", "#Tech", "#Innovation"],
        &["Artificial Intelligence", "Machine Learning"],
        75,
        &["Twitter Trends", "Tech News"],
        "Post during peak hours for maximum engagement",
        2,
        &["Real-time trends", "Social media analytics"],
        85,
    )
}

#[allow(clippy::too_many_arguments)]
fn generation_fallback(
    content: &str,
    hashtags: &[&str],
    trending_topics: &[&str],
    engagement_prediction: u32,
    trend_sources: &[&str],
    publish_suggestion: &str,
    trend_freshness: u32,
    data_sources: &[&str],
    confidence_score: u32,
) -> GenerationResult {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    GenerationResult {
        generated_content: GeneratedContent {
            kind: "post".to_string(),
            platform: "twitter".to_string(),
            content: content.to_string(),
            hashtags: owned(hashtags),
            trending_topics: owned(trending_topics),
            engagement_prediction,
            trend_sources: owned(trend_sources),
            publish_suggestion: publish_suggestion.to_string(),
        },
        metadata: GenerationMetadata {
            generation_time: format_utc_rfc3339(Utc::now()),
            trend_freshness,
            data_sources: owned(data_sources),
            confidence_score,
        },
    }
}

/// Map the trending endpoint's loosely shaped entries to feed ideas.
fn transform_trends<R: Rng>(trends: &[Value], now: DateTime<Utc>, rng: &mut R) -> Vec<DailyIdea> {
    let str_field = |trend: &Value, keys: &[&str]| {
        keys.iter()
            .filter_map(|key| trend.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string)
    };

    trends
        .iter()
        .enumerate()
        .map(|(index, trend)| {
            let created_at = trend
                .get("timestamp")
                .and_then(Value::as_i64)
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .unwrap_or_else(|| now - Duration::milliseconds(rng.random_range(0..86_400_000)));
            let time_ago = str_field(trend, &["timeAgo"])
                .unwrap_or_else(|| format!("{}h", rng.random_range(1..=24)));

            DailyIdea {
                id: format!("sonar_{}_{}", now.timestamp_millis(), index),
                content: str_field(trend, &["content", "text"]).unwrap_or_default(),
                author_name: COMMUNITY_AUTHOR.to_string(),
                category: Some(
                    str_field(trend, &["category", "community"])
                        .unwrap_or_else(|| "Trending".to_string()),
                ),
                created_at,
                time_ago: Some(time_ago),
            }
        })
        .collect()
}

/// Stock trending ideas, spaced two hours apart, newest first.
pub fn mock_trending_ideas(now: DateTime<Utc>, count: usize) -> Vec<DailyIdea> {
    const IDEAS: [(&str, &str); 5] = [
        (
            "Just shipped my first AI-powered app using @vercel and @openai. The developer experience is incredible - went from idea to production in under 24 hours. What's your go-to stack for rapid prototyping? #AI #WebDev #IndieHacker",
            "AI",
        ),
        (
            "The future of coding is here: GitHub Copilot just wrote 70% of my React component. But here's the real game-changer - understanding when NOT to use AI. Sometimes the best code is the one you write yourself. #Programming #AI #Tech",
            "Programming",
        ),
        (
            "From $0 to $10k MRR in 6 months. The secret? Building in public, consistent content, and actually talking to your users. No fancy marketing hacks, just real conversations. #Startups #SaaS #IndieDev",
            "Startups",
        ),
        (
            "Productivity hack: Delete social media from your phone. Use the web versions only. You'll be shocked how much time you get back. Bonus: Better focus, deeper work, more meaningful connections. #Productivity #LifeHacks",
            "Productivity",
        ),
        (
            "The AI revolution isn't coming. It's here. Last week I automated my entire content workflow with @anthropic Claude. Writing, editing, scheduling - all handled. What's the most impactful AI tool you've adopted? #AI #Automation #FutureOfWork",
            "AI",
        ),
    ];

    IDEAS
        .iter()
        .enumerate()
        .take(count)
        .map(|(i, (content, category))| {
            let created_at = now - Duration::hours(2 * (i as i64 + 1));
            DailyIdea {
                id: format!("trend_{}", i + 1),
                content: content.to_string(),
                author_name: COMMUNITY_AUTHOR.to_string(),
                category: Some(category.to_string()),
                created_at,
                time_ago: Some(time_ago(created_at, now)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    #[test]
    fn test_session_id_shape() {
        let id = session_id("agent123");
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "agent123");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_mock_trending_ideas_truncate_and_age() {
        let now = Utc::now();
        let ideas = mock_trending_ideas(now, 3);
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[0].time_ago.as_deref(), Some("2h"));
        assert_eq!(ideas[2].time_ago.as_deref(), Some("6h"));
        assert_eq!(mock_trending_ideas(now, 50).len(), 5);
    }

    #[test]
    fn test_transform_trends_field_fallbacks() {
        let now = Utc::now();
        let trends = vec![
            json!({ "text": "From text", "community": "ai", "timestamp": 1_700_000_000_000i64, "timeAgo": "3h" }),
            json!({ "content": "From content" }),
        ];
        let ideas = transform_trends(&trends, now, &mut rand::rng());

        assert_eq!(ideas[0].content, "From text");
        assert_eq!(ideas[0].category.as_deref(), Some("ai"));
        assert_eq!(ideas[0].created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(ideas[0].time_ago.as_deref(), Some("3h"));

        assert_eq!(ideas[1].category.as_deref(), Some("Trending"));
        assert!(ideas[1].created_at <= now);
        assert!(now - ideas[1].created_at <= Duration::hours(24));
        assert!(ideas[1].id.ends_with("_1"));
    }

    #[test]
    fn test_parse_embedded_accepts_prose_wrapped_json() {
        let parsed: Option<RankingResult> = parse_embedded(
            "Sure! {\"comparison\": {\"top_performer\": \"c1\"}} Hope that helps.",
            &["rankings", "comparison"],
        );
        assert_eq!(parsed.unwrap().comparison.top_performer, "c1");
        assert!(parse_embedded::<RankingResult>("no json", &["rankings"]).is_none());
    }

    #[test]
    fn test_parse_embedded_ignores_braces_in_prose() {
        let keys = ["generated_content"];
        assert!(parse_embedded::<GenerationResult>("Start with `fn main() {}` today", &keys).is_none());
        assert!(parse_embedded::<GenerationResult>("{}", &keys).is_none());
        assert!(parse_embedded::<GenerationResult>("{\"note\": \"hi\"}", &keys).is_none());
        assert!(parse_embedded::<RankingResult>("[1, 2]", &["rankings"]).is_none());

        let generated: GenerationResult = parse_embedded(
            "Here: {\"generated_content\": {\"content\": \"Ship it\"}}",
            &keys,
        )
        .unwrap();
        assert_eq!(generated.generated_content.content, "Ship it");
    }

    #[tokio::test]
    async fn test_offline_client_returns_mocks() {
        let client = AgentClient::new(Config::test_default().agent);
        assert!(!client.is_live());

        assert_eq!(client.analyze("hello").await, AnalysisResult::mock());

        let ranking = client.rank(&["a".to_string(), "b".to_string()]).await;
        assert_eq!(ranking.rankings.len(), 2);
        assert!(ranking
            .rankings
            .iter()
            .all(|r| (60..100).contains(&r.overall_score)));

        let generated = client.generate("launch tweet").await;
        assert_eq!(generated.metadata.confidence_score, 85);

        assert_eq!(client.generate_ideas(10).await.len(), 5);
    }
}
