//! Shared helpers for story-service integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use story_service::services::providers::mock::MockTextProvider;
use story_service::services::providers::GenerationParams;
use story_service::services::StoryService;
use story_service::{build_router, AppState};
use tower::util::ServiceExt;

pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Character names (array with descriptions) and genre are required.";

/// Router backed by the given mock provider, allowing any origin.
pub fn router_with(provider: Arc<MockTextProvider>) -> Router {
    let state = AppState {
        service_name: "story-service-test".to_string(),
        story_service: StoryService::new(provider, GenerationParams::default()),
    };
    build_router(state, &["*".to_string()])
}

/// Send a request and return status plus parsed JSON body (`Null` when the
/// body is empty).
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn generate(router: Router, body: Value) -> (StatusCode, Value) {
    send(router, post_json("/generate-story", &body)).await
}
