//! Fixed instruction template sent with every generation request.

const SYSTEM_PROMPT: &str = "You are a professional blog writer. You write engaging, \
informative and well-structured posts in clear, concise language for a general audience.";

/// System and user messages for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    system: &'static str,
    user: String,
}

impl Prompt {
    /// Embed `topic` verbatim into the blog-writing instruction.
    pub fn for_topic(topic: &str) -> Self {
        let user = format!(
            "Write a blog post of roughly 400-500 words about: {topic}\n\
             Structure it as:\n\
             1. An introduction that draws the reader in\n\
             2. A body of clearly separated paragraphs\n\
             3. A conclusion that sums up the key points\n\
             Separate paragraphs with a blank line and do not use markdown headings."
        );

        Self {
            system: SYSTEM_PROMPT,
            user,
        }
    }

    pub fn system(&self) -> &str {
        self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}
