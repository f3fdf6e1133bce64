//! Text-generation provider abstractions and implementations.
//!
//! Story generation depends only on [`TextProvider`]; the concrete backend
//! (Gemini, Cohere, mock) is chosen from configuration at startup.

pub mod cohere;
pub mod gemini;
pub mod mock;

use crate::config::{ProviderConfig, ProviderKind};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::Timeout => "timeout",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.without_url().to_string())
        } else {
            ProviderError::NetworkError(err.without_url().to_string())
        }
    }
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Other,
}

/// One generated text option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub finish_reason: FinishReason,
}

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: FinishReason::Complete,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Generation parameters for a provider call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Maximum output tokens.
    pub max_output_tokens: u32,

    /// Temperature (0.0 - 2.0).
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 2000,
            temperature: 0.7,
        }
    }
}

/// Trait for text generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Generate candidates for a prompt.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<Candidate>, ProviderError>;

    /// Check that the provider is usable. Does not call the remote API.
    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Build the configured provider.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn TextProvider>, ProviderError> {
    let provider: Arc<dyn TextProvider> = match config.kind {
        ProviderKind::Gemini => Arc::new(gemini::GeminiTextProvider::new(
            gemini::GeminiConfig::from_provider_config(config),
        )?),
        ProviderKind::Cohere => Arc::new(cohere::CohereTextProvider::new(
            cohere::CohereConfig::from_provider_config(config),
        )?),
        ProviderKind::Mock => Arc::new(mock::MockTextProvider::echo()),
    };
    Ok(provider)
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-success HTTP status into the matching error.
pub(crate) async fn check_status(provider: &str, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 429 {
        return Err(ProviderError::RateLimited);
    }

    let error_text = response.text().await.unwrap_or_default();
    Err(ProviderError::ApiError(format!(
        "{} API error {}: {}",
        provider, status, error_text
    )))
}

/// A filtered first candidate means no usable story.
pub(crate) fn reject_filtered(candidates: Vec<Candidate>) -> Result<Vec<Candidate>, ProviderError> {
    match candidates.first() {
        Some(first) if first.finish_reason == FinishReason::ContentFilter => {
            Err(ProviderError::ContentFiltered)
        }
        _ => Ok(candidates),
    }
}
