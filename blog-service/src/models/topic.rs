use serde::Deserialize;
use std::fmt;
use validator::{Validate, ValidationErrors};

/// Shown when the submitted topic is missing or blank.
pub const EMPTY_TOPIC_MESSAGE: &str = "Please enter a blog topic";

/// Raw `application/x-www-form-urlencoded` body of the blog form.
#[derive(Debug, Default, Deserialize)]
pub struct BlogForm {
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Validate)]
struct TopicInput {
    #[validate(length(min = 1, message = "Please enter a blog topic"))]
    value: String,
}

/// A non-empty, trimmed blog topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    /// Trim surrounding whitespace and reject what is left if empty.
    pub fn parse(raw: &str) -> Result<Self, ValidationErrors> {
        let input = TopicInput {
            value: raw.trim().to_string(),
        };
        input.validate()?;
        Ok(Self(input.value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First user-facing message carried by `errors`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| EMPTY_TOPIC_MESSAGE.to_string())
}
