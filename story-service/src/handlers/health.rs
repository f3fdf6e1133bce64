use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Liveness check: the configured provider is usable.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let provider = state.story_service.provider();

    match provider.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": state.service_name,
                "version": env!("CARGO_PKG_VERSION"),
                "provider": provider.name(),
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Provider health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": state.service_name,
                    "provider": provider.name(),
                    "error": e.to_string(),
                })),
            )
        }
    }
}
