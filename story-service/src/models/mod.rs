pub mod story;

pub use story::{is_present, prompt_text, Character, StoryBrief, StoryRequest, StoryResponse};
