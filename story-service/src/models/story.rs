//! Request/response types for story generation.
//!
//! The request body is kept as raw JSON values: any JSON object is accepted
//! and request validation decides which values count as present, reporting
//! failures with its own messages. A [`StoryBrief`] is the validated form and
//! the only input prompt rendering accepts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /generate-story`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    /// Expected to be an array of `{ characterName, description }` objects.
    #[serde(default)]
    pub character_names: Option<Value>,
    #[serde(default)]
    pub genre: Option<Value>,
    #[serde(default)]
    pub story_description: Option<Value>,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryResponse {
    pub story: String,
}

/// A character with both fields present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub description: String,
}

/// Validated story request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryBrief {
    pub genre: String,
    /// `None` when the client sent no usable description.
    pub story_description: Option<String>,
    /// Never empty; client order preserved.
    pub characters: Vec<Character>,
}

/// Whether a JSON value counts as set: `null`, `false`, `0` and `""` do not.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text a value contributes to the prompt.
///
/// Strings are used as-is, numbers and booleans in their JSON form, arrays
/// joined with `,`.
pub fn prompt_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(prompt_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
