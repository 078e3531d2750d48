use crate::models::{validation_message, BlogForm, Topic};
use crate::services::{GeneratedPost, Prompt};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{rejection::FormRejection, State},
    response::IntoResponse,
    Form,
};
use metrics::counter;

/// Only message users ever see for a failed generation.
pub const GENERATION_ERROR_MESSAGE: &str = "Error generating blog";

#[derive(Template, Default)]
#[template(path = "index.html")]
pub struct BlogPage {
    pub topic: String,
    pub validation_message: Option<String>,
    pub error_message: Option<String>,
    pub post: Option<PostView>,
}

pub struct PostView {
    pub topic: String,
    pub text: String,
    pub word_count: usize,
}

impl BlogPage {
    fn invalid(topic: String, message: String) -> Self {
        Self {
            topic,
            validation_message: Some(message),
            ..Self::default()
        }
    }

    fn generated(topic: &Topic, post: &GeneratedPost) -> Self {
        Self {
            topic: topic.to_string(),
            post: Some(PostView {
                topic: topic.to_string(),
                text: post.text().to_string(),
                word_count: post.word_count(),
            }),
            ..Self::default()
        }
    }

    fn failed(topic: &Topic) -> Self {
        Self {
            topic: topic.to_string(),
            error_message: Some(GENERATION_ERROR_MESSAGE.to_string()),
            ..Self::default()
        }
    }
}

pub async fn index() -> impl IntoResponse {
    BlogPage::default()
}

pub async fn generate(
    State(state): State<AppState>,
    form: Result<Form<BlogForm>, FormRejection>,
) -> impl IntoResponse {
    let raw_topic = match form {
        Ok(Form(form)) => form.topic,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable blog form submission");
            String::new()
        }
    };

    let topic = match Topic::parse(&raw_topic) {
        Ok(topic) => topic,
        Err(errors) => {
            tracing::warn!("Empty topic received");
            return BlogPage::invalid(raw_topic, validation_message(&errors));
        }
    };

    tracing::info!(topic_len = topic.as_str().len(), "Generating blog post");

    let prompt = Prompt::for_topic(topic.as_str());
    match state.generation_client.generate(&prompt).await {
        Ok(post) => {
            counter!("blog_generations_total", "outcome" => "success").increment(1);
            tracing::info!(
                chars = post.text().len(),
                words = post.word_count(),
                "Generated blog post"
            );
            BlogPage::generated(&topic, &post)
        }
        Err(e) => {
            counter!("blog_generations_total", "outcome" => "error").increment(1);
            tracing::error!(kind = e.kind(), error = %e, "Blog generation failed");
            BlogPage::failed(&topic)
        }
    }
}
