//! Integration tests that run the full application on a random port.
//! Run with: cargo test -p story-service --test health_check

use reqwest::Client;
use secrecy::Secret;
use service_core::config::Config;
use std::time::Duration;
use story_service::config::{
    Environment, GenerationSettings, ProviderConfig, ProviderKind, SecurityConfig, StoryConfig,
};
use story_service::startup::Application;

fn test_config() -> StoryConfig {
    StoryConfig {
        common: Config { port: 0 },
        environment: Environment::Dev,
        service_name: "story-service".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        provider: ProviderConfig {
            kind: ProviderKind::Mock,
            api_key: Secret::new(String::new()),
            model: "mock".to_string(),
            base_url: None,
            timeout_secs: 5,
        },
        generation: GenerationSettings::default(),
        security: SecurityConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

/// Spawn the application on a random port and return the port number.
async fn spawn_app() -> u16 {
    let app = Application::build(test_config())
        .await
        .expect("Failed to build application");

    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    port
}

#[tokio::test]
async fn health_check_returns_ok() {
    let port = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("http://localhost:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "story-service");
    assert_eq!(body["provider"], "mock");
}

#[tokio::test]
async fn generate_story_round_trip_over_http() {
    let port = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("http://localhost:{}/generate-story", port))
        .json(&serde_json::json!({
            "characterNames": [{ "characterName": "Mira", "description": "a cartographer" }],
            "genre": "mystery",
            "storyDescription": "A foggy harbor town."
        }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let story = body["story"].as_str().unwrap();
    assert!(story.starts_with("Mock story for:"));
    assert!(story.contains("Mira: a cartographer"));
}
