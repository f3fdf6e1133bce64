//! Cohere provider implementation using the `/v1/generate` endpoint.

use super::{
    check_status, http_client, reject_filtered, Candidate, FinishReason, GenerationParams,
    ProviderError, TextProvider,
};
use crate::config::ProviderConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cohere API base URL.
pub const COHERE_API_BASE: &str = "https://api.cohere.ai";

#[derive(Debug, Clone)]
pub struct CohereConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl CohereConfig {
    pub fn from_provider_config(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| COHERE_API_BASE.to_string()),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

pub struct CohereTextProvider {
    config: CohereConfig,
    client: Client,
}

impl CohereTextProvider {
    pub fn new(config: CohereConfig) -> Result<Self, ProviderError> {
        let client = http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!("{}/v1/generate", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextProvider for CohereTextProvider {
    fn name(&self) -> &'static str {
        "cohere"
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            max_tokens: params.max_output_tokens,
            temperature: params.temperature,
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Cohere API"
        );

        let response = self
            .client
            .post(self.generate_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let response = check_status("Cohere", response).await?;

        let api_response: GenerateResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {}", e.without_url()))
        })?;

        into_candidates(api_response)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Cohere API key not configured".to_string(),
            ));
        }
        Ok(())
    }
}

fn into_candidates(response: GenerateResponse) -> Result<Vec<Candidate>, ProviderError> {
    let candidates = response
        .generations
        .into_iter()
        .map(|g| Candidate {
            text: g.text,
            finish_reason: match g.finish_reason.as_deref() {
                Some("COMPLETE") | None => FinishReason::Complete,
                Some("MAX_TOKENS") => FinishReason::Length,
                Some("ERROR_TOXIC") => FinishReason::ContentFilter,
                Some(_) => FinishReason::Other,
            },
        })
        .collect();

    reject_filtered(candidates)
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}
