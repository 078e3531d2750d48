pub mod topic;

pub use topic::{validation_message, BlogForm, Topic, EMPTY_TOPIC_MESSAGE};
