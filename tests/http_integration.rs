//! HTTP integration tests for the guide endpoints.
//!
//! Drives the full router (handlers, pipeline, in-memory store, mock
//! provider) through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use growth_guide::adapters::ai::{MockTextProvider, DEFAULT_MOCK_CONTENT};
use growth_guide::adapters::http::guide_router;
use growth_guide::adapters::storage::InMemoryProfileStore;
use growth_guide::bootstrap::app_state_with;
use growth_guide::config::AppConfig;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app() -> Router {
    let state = app_state_with(
        &AppConfig::default(),
        Some(Arc::new(MockTextProvider::new())),
        Arc::new(InMemoryProfileStore::new()),
    );
    guide_router(state)
}

fn offline_app() -> Router {
    let state = app_state_with(&AppConfig::default(), None, Arc::new(InMemoryProfileStore::new()));
    guide_router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// =============================================================================
// Analyze
// =============================================================================

#[tokio::test]
async fn analyze_returns_full_result() {
    let (status, body) = send(
        &app(),
        post_json(
            "/api/v1/analyze",
            json!({"user_id": "http-learner", "query": "Write my essay for me"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "http-learner");
    assert_eq!(body["ethics"]["decision"], "redirect");
    assert_eq!(body["strategy"], "decline-with-alternative");
    assert_eq!(body["profile"]["interaction_count"], 1);
    assert!(body["ethics"]["concerns"]
        .as_array()
        .unwrap()
        .contains(&json!("dependency_creation")));
    assert_eq!(
        body["capability"]["weaknesses"],
        json!(["Needs foundational knowledge and practice"])
    );
    assert!(body["capability"]["evidence"]
        .as_str()
        .unwrap()
        .contains("shortcut_request (-6.0)"));
    assert!(body["reasoning_log"]
        .as_str()
        .unwrap()
        .contains("STEP 3: ETHICAL EVALUATION"));
}

#[tokio::test]
async fn analyze_rejects_blank_query() {
    let (status, body) = send(
        &app(),
        post_json("/api/v1/analyze", json!({"user_id": "u1", "query": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_FIELD");
}

#[tokio::test]
async fn analyze_rejects_blank_user_id() {
    let (status, body) = send(
        &app(),
        post_json("/api/v1/analyze", json!({"user_id": "", "query": "Explain recursion"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_FIELD");
}

#[tokio::test]
async fn analyze_rejects_malformed_json() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Respond
// =============================================================================

#[tokio::test]
async fn respond_returns_guidance_text() {
    let (status, body) = send(
        &app(),
        post_json(
            "/api/v1/respond",
            json!({"user_id": "u2", "query": "I tried steps 1–2 but got stuck at step 3"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "provider");
    assert_eq!(body["text"], DEFAULT_MOCK_CONTENT);
    assert_eq!(body["analysis"]["strategy"], "explain-example-practice-reflect");
}

#[tokio::test]
async fn offline_respond_uses_template_text() {
    let (status, body) = send(
        &offline_app(),
        post_json("/api/v1/respond", json!({"user_id": "u3", "query": "Write my essay for me"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "template");
    assert_ne!(body["text"], DEFAULT_MOCK_CONTENT);
    assert!(!body["text"].as_str().unwrap().trim().is_empty());
}

// =============================================================================
// Profiles
// =============================================================================

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let (status, body) = send(&app(), get("/api/v1/profiles/nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn profile_is_available_after_analyze() {
    let app = app();
    for query in ["Explain recursion", "Why does this proof work?"] {
        let (status, _) = send(
            &app,
            post_json("/api/v1/analyze", json!({"user_id": "returning", "query": query})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get("/api/v1/profiles/returning")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "returning");
    assert_eq!(body["interaction_count"], 2);
    assert_eq!(body["topic_frequency"]["proofs"], 1);
}
