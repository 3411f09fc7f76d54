//! Story requests, generation prompts and request-scoped contexts

pub mod context;
pub mod prompt;
pub mod request;

pub use context::{ArtifactCache, ContextId, StoryContext};
pub use prompt::{portrait_prompt, story_prompt, STORY_USER_MESSAGE};
pub use request::StoryRequest;
