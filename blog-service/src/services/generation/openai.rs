//! OpenAI chat-completions adapter.

use super::{GeneratedPost, GenerationClient, GenerationError, MAX_TOKENS, MODEL, TEMPERATURE};
use crate::config::OpenAiConfig;
use crate::services::prompt::Prompt;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Longest slice of an upstream error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 300;

pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GenerationError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request<'a>(&self, prompt: &'a Prompt) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<GeneratedPost, GenerationError> {
        let request = self.build_request(prompt);

        tracing::debug!(
            model = MODEL,
            prompt_len = prompt.user().len(),
            "Sending request to chat completions API"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = truncate(&error_text, MAX_ERROR_BODY_CHARS);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    GenerationError::Authentication(format!("{}: {}", status, detail))
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    GenerationError::RateLimit(format!("{}: {}", status, detail))
                }
                _ => GenerationError::Unknown(format!("API error {}: {}", status, detail)),
            });
        }

        let api_response: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                GenerationError::Unknown(format!("Failed to parse response: {}", e))
            } else {
                GenerationError::Transport(e.to_string())
            }
        })?;

        let usage = api_response.usage;
        let text = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::Unknown("Empty completion".to_string()))?;

        let post = GeneratedPost::new(text);
        tracing::debug!(
            words = post.word_count(),
            prompt_tokens = usage.as_ref().map(|u| u.prompt_tokens),
            completion_tokens = usage.as_ref().map(|u| u.completion_tokens),
            "Received completion"
        );

        Ok(post)
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
