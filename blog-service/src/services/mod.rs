pub mod generation;
pub mod prompt;

pub use generation::{GeneratedPost, GenerationClient, GenerationError, OpenAiClient};
pub use prompt::Prompt;
