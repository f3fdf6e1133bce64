use crate::models::{Character, StoryBrief};

/// Substituted when the request carries no story description.
pub const DEFAULT_STORY_DESCRIPTION: &str = "No specific description provided.";

/// Minimum story length the prompt asks for.
pub const MIN_STORY_WORDS: u32 = 2000;

/// `name: description` per character, one per line, in request order.
pub fn character_details(characters: &[Character]) -> String {
    characters
        .iter()
        .map(|c| format!("{}: {}", c.name, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(brief: &StoryBrief) -> String {
    let description = brief
        .story_description
        .as_deref()
        .unwrap_or(DEFAULT_STORY_DESCRIPTION);

    format!(
        "Create a detailed {genre} story based on the following description and characters:\n\
         \n\
         Story Description:\n\
         {description}\n\
         \n\
         Character Descriptions:\n\
         {details}\n\
         \n\
         Ensure the story includes at least {words} words and develops the characters \
         meaningfully within the narrative.\n",
        genre = brief.genre,
        description = description,
        details = character_details(&brief.characters),
        words = MIN_STORY_WORDS,
    )
}
