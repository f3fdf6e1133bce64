pub mod error;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod story;

pub use error::StoryError;
pub use story::StoryService;
