// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily ideas feed tests.

use axum::http::StatusCode;
use post2x::models::NewDailyIdea;
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_empty_feed_is_regenerated() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user_feed");

    let response = app
        .oneshot(common::authed_get("/api/daily-ideas", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let ideas = body["ideas"].as_array().unwrap();

    // Offline agent yields the five stock trending ideas
    assert_eq!(ideas.len(), 5);
    for idea in ideas {
        assert_eq!(idea["author_name"], "Community Trend");
        assert!(idea["timeAgo"].as_str().unwrap().ends_with('m'));
    }

    assert_eq!(state.store.get_daily_ideas(100).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_existing_feed_is_not_regenerated() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user_feed");

    state
        .store
        .create_daily_idea(NewDailyIdea::new("Only idea", None, Some("AI".to_string())))
        .await
        .unwrap();

    let response = app
        .oneshot(common::authed_get("/api/daily-ideas", &token))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    let ideas = body["ideas"].as_array().unwrap();

    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0]["content"], "Only idea");
    assert_eq!(ideas[0]["timeAgo"], "0m");
}

#[tokio::test]
async fn test_refresh_appends_generated_ideas() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user_feed");

    state
        .store
        .create_daily_idea(NewDailyIdea::new("Existing", None, None))
        .await
        .unwrap();

    let response = app
        .oneshot(common::authed_get("/api/daily-ideas?refresh=true&limit=3", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["ideas"].as_array().unwrap().len(), 3);

    assert_eq!(state.store.get_daily_ideas(100).await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_create_idea() {
    let (app, _) = common::create_test_app();
    let token = common::create_test_jwt("user_feed");

    let response = app
        .clone()
        .oneshot(common::json_post(
            "/api/daily-ideas",
            &token,
            &json!({ "content": "Thread on Rust error handling", "authorName": "Ferris", "category": "Programming" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["idea"]["author_name"], "Ferris");
    assert_eq!(body["idea"]["category"], "Programming");

    let response = app
        .oneshot(common::json_post(
            "/api/daily-ideas",
            &token,
            &json!({ "content": "No author" }),
        ))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["idea"]["author_name"], "Community Trend");
}

#[tokio::test]
async fn test_create_idea_requires_content() {
    let (app, _) = common::create_test_app();
    let token = common::create_test_jwt("user_feed");

    for body in [json!({}), json!({ "content": 7 }), json!({ "content": "" })] {
        let response = app
            .clone()
            .oneshot(common::json_post("/api/daily-ideas", &token, &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_feed_requires_auth() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/daily-ideas")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
