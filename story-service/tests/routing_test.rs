//! Routing, fallback and middleware behaviour of the HTTP surface.

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{router_with, send};
use serde_json::json;
use std::sync::Arc;
use story_service::services::providers::mock::MockTextProvider;
use tower::util::ServiceExt;

fn router() -> axum::Router {
    router_with(Arc::new(MockTextProvider::with_story("story")))
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let request = Request::builder()
        .uri("/stories")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Route not found." }));
}

#[tokio::test]
async fn wrong_method_on_story_route_returns_404() {
    let request = Request::builder()
        .method("GET")
        .uri("/generate-story")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found.");
}

#[tokio::test]
async fn health_reports_provider() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "story-service-test");
    assert_eq!(body["provider"], "mock");
}

#[tokio::test]
async fn metrics_endpoint_serves_text() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let response = router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn any_origin_is_mirrored() {
    let response = router()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/generate-story")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}
