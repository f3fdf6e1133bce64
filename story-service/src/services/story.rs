//! Story generation: validate the request, render the prompt, call the
//! provider once and keep the first candidate.

use crate::models::{is_present, prompt_text, Character, StoryBrief, StoryRequest};
use crate::services::error::StoryError;
use crate::services::metrics;
use crate::services::prompt::build_prompt;
use crate::services::providers::{GenerationParams, TextProvider};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct StoryService {
    provider: Arc<dyn TextProvider>,
    params: GenerationParams,
}

impl StoryService {
    pub fn new(provider: Arc<dyn TextProvider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Generate a story for `request`.
    #[tracing::instrument(skip_all, fields(provider = self.provider.name()))]
    pub async fn generate(&self, request: StoryRequest) -> Result<String, StoryError> {
        let brief = validate(request)?;

        tracing::info!(
            genre = %brief.genre,
            characters = brief.characters.len(),
            has_description = brief.story_description.is_some(),
            "Generating story"
        );

        let prompt = build_prompt(&brief);

        let start = Instant::now();
        let result = self.provider.generate(&prompt, &self.params).await;
        metrics::record_provider_latency(self.provider.name(), start.elapsed().as_secs_f64());

        let candidates = result.map_err(|e| {
            tracing::error!(error = %e, "Error generating story");
            metrics::record_provider_error(self.provider.name(), e.error_type());
            StoryError::Provider(e)
        })?;

        let story = candidates
            .into_iter()
            .next()
            .map(|c| c.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                tracing::warn!("Story generation failed: provider returned no text");
                StoryError::EmptyGeneration
            })?;

        tracing::info!(story_len = story.len(), "Story generated");
        tracing::debug!(%story, "Generated story");

        Ok(story)
    }
}

/// Check a request in order: character list present, genre present, then
/// every entry complete. The first failure is returned.
///
/// A value counts as present when it is truthy (see [`is_present`]), so a
/// non-array `characterNames` or a `genre` of `""`, `0` or `null` fails the
/// first two checks with the same message.
pub fn validate(request: StoryRequest) -> Result<StoryBrief, StoryError> {
    let entries = match request.character_names {
        Some(Value::Array(entries)) if !entries.is_empty() => entries,
        _ => return Err(StoryError::MissingFields),
    };

    let genre = request
        .genre
        .filter(is_present)
        .ok_or(StoryError::MissingFields)?;

    let characters = entries
        .iter()
        .map(into_character)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StoryBrief {
        genre: prompt_text(&genre),
        story_description: request
            .story_description
            .filter(is_present)
            .map(|d| prompt_text(&d)),
        characters,
    })
}

/// An entry is complete when both fields are present. Incomplete entries are
/// reported as received, extra fields and explicit nulls included.
fn into_character(entry: &Value) -> Result<Character, StoryError> {
    let name = entry.get("characterName").filter(|v| is_present(v));
    let description = entry.get("description").filter(|v| is_present(v));

    match (name, description) {
        (Some(name), Some(description)) => Ok(Character {
            name: prompt_text(name),
            description: prompt_text(description),
        }),
        _ => Err(StoryError::InvalidCharacter(entry.to_string())),
    }
}
