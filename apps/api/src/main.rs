mod auth;
mod config;
mod db;
mod errors;
mod grounding;
mod llm_client;
mod models;
mod pipeline;
mod profile;
mod render;
mod routes;
mod state;
mod tailoring;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::resolver_for;
use crate::config::{Config, IdentityStrategy};
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::GeminiClient;
use crate::pipeline::TailorPipeline;
use crate::profile::PgProfileStore;
use crate::render::compiler::DocumentCompiler;
use crate::render::templates::DocumentRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize generation client
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; generation requests will fail with a configuration error");
    }
    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_base_url.clone(),
        config.gemini_model.clone(),
        Duration::from_secs(config.generation_timeout_secs),
    );
    info!(
        "Gemini client initialized (model: {}, timeout: {}s)",
        gemini.model(),
        config.generation_timeout_secs
    );

    // Document pipeline: renderer -> latexmk (local, then container) -> bundle
    tokio::fs::create_dir_all(&config.artifacts_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.artifacts_dir.display()))?;
    let compiler = DocumentCompiler::latexmk_chain(
        Duration::from_secs(config.latex_local_timeout_secs),
        &config.latex_docker_image,
        Duration::from_secs(config.latex_container_timeout_secs),
    );
    let pipeline = TailorPipeline::new(
        Arc::new(gemini),
        DocumentRenderer::new(config.artifacts_dir.clone()),
        compiler,
        config.bullet_limit,
    );
    info!(
        "Artifacts directory: {} (bullet limit {})",
        config.artifacts_dir.display(),
        config.bullet_limit
    );

    // Identity strategy is fixed for the lifetime of the process
    let resolver = resolver_for(&config.identity);
    match &config.identity {
        IdentityStrategy::Jwt { .. } => info!("Identity strategy: jwt (HS256)"),
        IdentityStrategy::Anonymous => info!("Identity strategy: anonymous"),
    }

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        profiles: Arc::new(PgProfileStore::new(db)),
        resolver,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
