// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Agent client tests against a local stand-in for the inference service.

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use post2x::config::Config;
use post2x::models::AnalysisResult;
use post2x::services::AgentClient;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

/// Serve one canned response on both agent endpoints. Returns the base URL.
async fn spawn_agent(status: StatusCode, response: Value, recorded: Recorded) -> String {
    let handler = move |headers: HeaderMap, Json(payload): Json<Value>| {
        let response = response.clone();
        let recorded = recorded.clone();
        async move {
            let key = headers
                .get("x-api-key")
                .or_else(|| headers.get("authorization"))
                .and_then(|h| h.to_str().ok())
                .map(str::to_string);
            recorded.requests.lock().unwrap().push((key, payload));
            (status, Json(response))
        }
    };

    let app = Router::new()
        .route("/v3/inference/chat/", post(handler.clone()))
        .route("/sonar/trending-tweets", post(handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn live_client(base_url: &str) -> AgentClient {
    let mut agent = Config::test_default().agent;
    agent.api_key = Some("sk_live_test".to_string());
    agent.offline = false;
    agent.inference_url = format!("{}/v3/inference/chat/", base_url);
    agent.api_base = base_url.to_string();
    AgentClient::new(agent)
}

#[tokio::test]
async fn test_analyze_parses_text_scores() {
    let recorded = Recorded::default();
    let base = spawn_agent(
        StatusCode::OK,
        json!({ "response": "Virality: 82\nHook: 70\nProfession: Founder\nControversiality: none" }),
        recorded.clone(),
    )
    .await;

    let result = live_client(&base).analyze("My launch post").await;

    assert_eq!(result.scores.virality, 82);
    assert_eq!(result.scores.hook, 70);
    assert_eq!(result.target_group.profession, "Founder");
    assert_eq!(result.suggestions.len(), 5);

    let requests = recorded.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (key, payload) = &requests[0];
    assert_eq!(key.as_deref(), Some("sk_live_test"));
    assert_eq!(payload["user_id"], "anonymous");
    assert!(payload["message"].as_str().unwrap().contains("My launch post"));
    let session = payload["session_id"].as_str().unwrap();
    assert!(session.starts_with(&format!("{}-", payload["agent_id"].as_str().unwrap())));
}

#[tokio::test]
async fn test_analyze_uses_embedded_json() {
    let embedded = json!({ "scores": { "clarity": 91 }, "controversiality": "Niche & Spicy" });
    let base = spawn_agent(
        StatusCode::OK,
        json!({ "response": format!("Analysis follows. {} Done.", embedded) }),
        Recorded::default(),
    )
    .await;

    let result = live_client(&base).analyze("x").await;
    assert_eq!(result.scores.clarity, 91);
    assert_eq!(result.controversiality.as_str(), "Niche & Spicy");
}

#[tokio::test]
async fn test_analyze_error_status_yields_randomized_mock() {
    let base = spawn_agent(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "boom" }),
        Recorded::default(),
    )
    .await;

    let result = live_client(&base).analyze("x").await;

    assert!((30..70).contains(&result.scores.virality));
    assert!((60..90).contains(&result.scores.clarity));
    assert_eq!(result.suggestions, AnalysisResult::mock().suggestions);
}

#[tokio::test]
async fn test_unreachable_agent_still_answers() {
    // Nothing listens on this port
    let client = live_client("http://127.0.0.1:9");

    let result = client.analyze("x").await;
    assert!(result.scores.to_array().iter().all(|s| *s <= 100));

    let ranking = client.rank(&["a".to_string()]).await;
    assert_eq!(ranking.rankings[0].content_id, "error_0");
    assert_eq!(ranking.rankings[0].overall_score, 50);

    let generated = client.generate("x").await;
    assert_eq!(generated.metadata.confidence_score, 0);
    assert_eq!(generated.generated_content.hashtags, vec!["#Error"]);

    assert_eq!(client.generate_ideas(3).await.len(), 3);
}

#[tokio::test]
async fn test_rank_parses_json_and_falls_back_on_prose() {
    let ranking = json!({
        "rankings": [{ "rank": 1, "content_id": "c2", "overall_score": 91 }],
        "comparison": { "top_performer": "c2" }
    });
    let base = spawn_agent(
        StatusCode::OK,
        json!({ "response": ranking.to_string() }),
        Recorded::default(),
    )
    .await;
    let parsed = live_client(&base)
        .rank(&["a".to_string(), "b".to_string()])
        .await;
    assert_eq!(parsed.rankings[0].content_id, "c2");
    assert_eq!(parsed.comparison.top_performer, "c2");

    let base = spawn_agent(
        StatusCode::OK,
        json!({ "response": "The second one is better." }),
        Recorded::default(),
    )
    .await;
    let fallback = live_client(&base)
        .rank(&["a".to_string(), "b".to_string(), "c".to_string()])
        .await;
    let scores: Vec<u32> = fallback.rankings.iter().map(|r| r.overall_score).collect();
    assert_eq!(scores, vec![75, 65, 55]);
    assert_eq!(fallback.comparison.top_performer, "fallback_0");
}

#[tokio::test]
async fn test_generate_wraps_raw_text() {
    let base = spawn_agent(
        StatusCode::OK,
        json!({ "response": "Hot take: tabs are fine." }),
        Recorded::default(),
    )
    .await;

    let result = live_client(&base).generate("tabs vs spaces").await;
    assert_eq!(result.generated_content.content, "Hot take: tabs are fine.");
    assert_eq!(result.generated_content.engagement_prediction, 70);
    assert_eq!(result.metadata.data_sources, vec!["AI Model"]);
}

#[tokio::test]
async fn test_generate_ideas_maps_trends() {
    let recorded = Recorded::default();
    let base = spawn_agent(
        StatusCode::OK,
        json!({ "trends": [
            { "text": "Trend one", "community": "ai", "timeAgo": "4h" },
            { "content": "Trend two", "category": "Startups", "timestamp": 1_700_000_000_000i64 }
        ]}),
        recorded.clone(),
    )
    .await;

    let ideas = live_client(&base).generate_ideas(10).await;
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[0].content, "Trend one");
    assert_eq!(ideas[0].category.as_deref(), Some("ai"));
    assert_eq!(ideas[0].time_ago.as_deref(), Some("4h"));
    assert_eq!(ideas[1].created_at.timestamp_millis(), 1_700_000_000_000);

    let requests = recorded.requests.lock().unwrap();
    let (auth, payload) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk_live_test"));
    assert_eq!(payload["count"], 10);
    assert_eq!(payload["timeframe"], "24h");
}

#[tokio::test]
async fn test_generate_ideas_without_trends_uses_mock() {
    let base = spawn_agent(StatusCode::OK, json!({ "status": "ok" }), Recorded::default()).await;

    let ideas = live_client(&base).generate_ideas(2).await;
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[0].id, "trend_1");
}

#[tokio::test]
async fn test_generate_keeps_prose_with_code_braces() {
    let reply = "Rust tip of the day: `fn main() {}` is all you need to start. #rustlang";
    let base = spawn_agent(StatusCode::OK, json!({ "response": reply }), Recorded::default()).await;

    let result = live_client(&base).generate("rust tips").await;
    assert_eq!(result.generated_content.content, reply);
    assert_eq!(result.generated_content.engagement_prediction, 70);
    assert_eq!(result.generated_content.hashtags, vec!["#Content", "#SocialMedia"]);
}

#[tokio::test]
async fn test_rank_prose_with_braces_uses_fallback() {
    let base = spawn_agent(
        StatusCode::OK,
        json!({ "response": "Post 2 wins; it uses {} placeholders less." }),
        Recorded::default(),
    )
    .await;

    let result = live_client(&base)
        .rank(&["a".to_string(), "b".to_string()])
        .await;
    let ids: Vec<&str> = result.rankings.iter().map(|r| r.content_id.as_str()).collect();
    assert_eq!(ids, vec!["fallback_0", "fallback_1"]);
    assert_eq!(result.comparison.top_performer, "fallback_0");
}

#[tokio::test]
async fn test_generate_parses_structured_reply() {
    let reply = json!({
        "generated_content": { "content": "Structured post", "hashtags": ["#Ship"] }
    });
    let base = spawn_agent(
        StatusCode::OK,
        json!({ "response": format!("Here you go: {}", reply) }),
        Recorded::default(),
    )
    .await;

    let result = live_client(&base).generate("x").await;
    assert_eq!(result.generated_content.content, "Structured post");
    assert_eq!(result.generated_content.hashtags, vec!["#Ship"]);
}
