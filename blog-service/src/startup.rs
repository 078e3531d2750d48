//! Router construction and server lifecycle.

use crate::config::BlogConfig;
use crate::handlers::{
    blog::{generate, index},
    health::health_check,
    metrics::metrics,
    not_found,
};
use crate::services::generation::{OpenAiClient, MODEL};
use crate::services::GenerationClient;
use crate::AppState;
use axum::{http::Request, middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware,
    tracing::make_request_span,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(generate))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| make_request_span(request)),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the OpenAI client described by `config`.
    ///
    /// `BlogConfig::load` already rejects a blank key; the check here covers
    /// configs assembled by hand without going through `load`.
    pub async fn build(config: BlogConfig) -> Result<Self, AppError> {
        if !config.openai.has_api_key() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OPENAI_API_KEY is required"
            )));
        }

        let client = OpenAiClient::new(config.openai.clone())
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        tracing::info!(
            model = MODEL,
            base_url = %config.openai.base_url,
            "Initialized OpenAI generation client"
        );

        Self::build_with_client(config, Arc::new(client)).await
    }

    /// Build the application around an arbitrary generation client.
    pub async fn build_with_client(
        config: BlogConfig,
        generation_client: Arc<dyn GenerationClient>,
    ) -> Result<Self, AppError> {
        // Port 0 picks a random port (tests).
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Blog service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(AppState::new(generation_client)),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM, then drain in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
