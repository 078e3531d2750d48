pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::GenerationClient;
use std::sync::Arc;

/// Shared application state. Immutable; cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub generation_client: Arc<dyn GenerationClient>,
}

impl AppState {
    pub fn new(generation_client: Arc<dyn GenerationClient>) -> Self {
        Self { generation_client }
    }
}
