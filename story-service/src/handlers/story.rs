use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;

use crate::models::{StoryRequest, StoryResponse};
use crate::services::{metrics, StoryError};
use crate::startup::AppState;

/// `POST /generate-story`
pub async fn generate_story(
    State(state): State<AppState>,
    payload: Result<Json<StoryRequest>, JsonRejection>,
) -> Result<Json<StoryResponse>, AppError> {
    let result = match payload {
        Ok(Json(request)) => state.story_service.generate(request).await,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected malformed story request");
            Err(StoryError::MalformedBody(rejection.body_text()))
        }
    };

    match result {
        Ok(story) => {
            metrics::record_story_request("success");
            Ok(Json(StoryResponse { story }))
        }
        Err(err) => {
            metrics::record_story_request(err.outcome());
            if !matches!(err, StoryError::Provider(_)) {
                tracing::info!(error = %err, "Story request rejected");
            }
            Err(err.into())
        }
    }
}
