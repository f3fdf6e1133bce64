use crate::services::providers::ProviderError;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoryError {
    #[error("Character names (array with descriptions) and genre are required.")]
    MissingFields,

    #[error("Each character must have a 'characterName' and 'description'. Invalid character: {0}")]
    InvalidCharacter(String),

    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error("Failed to generate story content")]
    EmptyGeneration,

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl StoryError {
    /// Outcome label recorded in `story_requests_total`.
    pub fn outcome(&self) -> &'static str {
        match self {
            StoryError::MissingFields
            | StoryError::InvalidCharacter(_)
            | StoryError::MalformedBody(_) => "invalid_request",
            StoryError::EmptyGeneration => "empty_generation",
            StoryError::Provider(_) => "provider_error",
        }
    }
}

impl From<StoryError> for AppError {
    fn from(err: StoryError) -> Self {
        match err {
            StoryError::Provider(e) => AppError::InternalError(anyhow::Error::new(e)),
            other => AppError::BadRequest(anyhow::anyhow!(other.to_string())),
        }
    }
}
