//! Shared helpers for blog-service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use blog_service::config::{BlogConfig, OpenAiConfig};
use blog_service::services::{GeneratedPost, GenerationClient, GenerationError, Prompt};
use blog_service::startup::Application;
use service_core::config::Config;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the recording client answers with.
pub enum Reply {
    Text(String),
    Auth,
    RateLimit,
    Transport,
    Unknown,
}

/// Generation client double that records every prompt it receives.
pub struct RecordingClient {
    reply: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Prompt>>,
}

impl RecordingClient {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn returning(text: &str) -> Arc<Self> {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for RecordingClient {
    async fn generate(&self, prompt: &Prompt) -> Result<GeneratedPost, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());

        match &self.reply {
            Reply::Text(text) => Ok(GeneratedPost::new(text.clone())),
            Reply::Auth => Err(GenerationError::Authentication(
                "401 Unauthorized: Incorrect API key provided: sk-bad".to_string(),
            )),
            Reply::RateLimit => Err(GenerationError::RateLimit(
                "429 Too Many Requests: quota exceeded".to_string(),
            )),
            Reply::Transport => Err(GenerationError::Transport(
                "error sending request: connection refused".to_string(),
            )),
            Reply::Unknown => Err(GenerationError::Unknown("Empty completion".to_string())),
        }
    }
}

pub fn test_config() -> BlogConfig {
    BlogConfig {
        common: Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        openai: OpenAiConfig::new("test-api-key"),
        otlp_endpoint: None,
    }
}

/// Spawn the application on a random port and return its base URL.
pub async fn spawn_app(client: Arc<dyn GenerationClient>) -> String {
    let app = Application::build_with_client(test_config(), client)
        .await
        .expect("Failed to build application");

    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{}", port)
}
