mod config;
mod errors;
mod extraction;
mod generation;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::PdfTextExtractor;
use crate::generation::client::GenerationClient;
use crate::llm_client::retry::RetryingBackend;
use crate::llm_client::{GeminiClient, GenerationBackend};
use crate::routes::build_router;
use crate::session::handle::SessionHandle;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Campaign Peel API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize generative backend
    let gemini: Arc<dyn GenerationBackend> =
        Arc::new(GeminiClient::new(config.gemini_api_key.clone())?);
    let backend: Arc<dyn GenerationBackend> = if config.generation_max_retries > 0 {
        info!(
            "Generation retries enabled: max_retries={}",
            config.generation_max_retries
        );
        Arc::new(
            RetryingBackend::new(gemini, config.generation_max_retries)
                .with_base_delay(Duration::from_millis(config.generation_retry_base_ms)),
        )
    } else {
        gemini
    };
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // One in-memory session per process
    let session = SessionHandle::new(
        GenerationClient::new(backend),
        Arc::new(PdfTextExtractor),
    );

    let state = AppState {
        session,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
