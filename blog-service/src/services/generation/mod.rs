//! Text generation abstraction.
//!
//! The web handler only sees [`GenerationClient`]; production wires in the
//! OpenAI adapter and tests substitute their own implementation.

pub mod openai;

use crate::services::prompt::Prompt;
use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiClient;

/// Chat model used for every request.
pub const MODEL: &str = "gpt-3.5-turbo";

/// Sampling temperature.
pub const TEMPERATURE: f32 = 0.7;

/// Upper bound on generated tokens.
pub const MAX_TOKENS: u32 = 800;

/// Failure of a single generation call.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Unknown(String),
}

impl GenerationError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Authentication(_) => "authentication",
            GenerationError::RateLimit(_) => "rate_limit",
            GenerationError::Transport(_) => "transport",
            GenerationError::Unknown(_) => "unknown",
        }
    }
}

/// Text returned by the generation API for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPost {
    text: String,
}

impl GeneratedPost {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// One-shot text generation. Implementations make exactly one upstream call
/// per invocation and never retry.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<GeneratedPost, GenerationError>;
}
