//! Mock provider implementation for tests and local runs.

use super::{Candidate, GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Echo the prompt back as a single candidate.
    Echo,
    /// Return these candidate texts as-is.
    Candidates(Vec<String>),
    /// Fail every call with an API error carrying this message.
    Fail(String),
}

/// Mock text provider that records every prompt it receives.
pub struct MockTextProvider {
    behavior: MockBehavior,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    pub fn with_story(story: impl Into<String>) -> Self {
        Self::new(MockBehavior::Candidates(vec![story.into()]))
    }

    pub fn with_candidates(candidates: Vec<String>) -> Self {
        Self::new(MockBehavior::Candidates(candidates))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fail(message.into()))
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<Vec<Candidate>, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.behavior {
            MockBehavior::Echo => Ok(vec![Candidate::new(format!(
                "Mock story for: {}",
                prompt
            ))]),
            MockBehavior::Candidates(texts) => {
                Ok(texts.iter().map(|t| Candidate::new(t.as_str())).collect())
            }
            MockBehavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_prompts_in_order() {
        let provider = MockTextProvider::with_story("A story");
        let params = GenerationParams::default();

        provider.generate("first", &params).await.unwrap();
        provider.generate("second", &params).await.unwrap();

        assert_eq!(provider.prompts(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn failing_mock_returns_api_error() {
        let provider = MockTextProvider::failing("upstream exploded");
        let result = provider.generate("prompt", &GenerationParams::default()).await;
        assert!(matches!(result, Err(ProviderError::ApiError(msg)) if msg == "upstream exploded"));
    }

    #[tokio::test]
    async fn echo_includes_prompt() {
        let candidates = MockTextProvider::echo()
            .generate("a mystery", &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(candidates[0].text(), "Mock story for: a mystery");
    }
}
