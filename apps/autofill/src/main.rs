mod answers;
mod config;
mod errors;
mod jobs;
mod llm_client;
mod profile;
mod routes;
mod state;

use anyhow::{bail, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::answers::store::AnswerStore;
use crate::config::Config;
use crate::llm_client::{AnthropicClient, FallbackGenerator, OpenAiCompatibleClient, TextGenerator};
use crate::profile::load_profile_text;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing LLM keys or bad values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Autofill v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {}", config.data_dir.display());

    // Open the answer store (loaded once, flushed on every write)
    let store = AnswerStore::open(&config.answer_store_path)?;
    if store.is_empty() {
        info!("No memorized answers yet at {}", store.path().display());
    } else if let Some(updated) = store.metadata().last_updated {
        info!("Answer store last updated {updated}");
    }

    // Load the candidate profile once for the process lifetime
    let profile = load_profile_text(&config.resume_path)?;

    // Initialize the LLM provider chain
    let generator = build_generator(&config)?;
    info!(
        "LLM providers (in fallback order): {}",
        generator.backend_names().join(" → ")
    );

    let state = AppState::new(store, Arc::new(generator), profile, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the provider chain: Fireworks, then OpenAI, then Anthropic,
/// skipping any provider without an API key.
fn build_generator(config: &Config) -> Result<FallbackGenerator> {
    let mut backends: Vec<Arc<dyn TextGenerator>> = Vec::new();

    if let Some(key) = &config.fireworks_api_key {
        let client = OpenAiCompatibleClient::fireworks(config.fireworks_model.clone(), key.clone())?;
        info!("Fireworks model: {}", client.model());
        backends.push(Arc::new(client));
    }
    if let Some(key) = &config.openai_api_key {
        let client = OpenAiCompatibleClient::openai(config.openai_model.clone(), key.clone())?;
        info!("OpenAI model: {}", client.model());
        backends.push(Arc::new(client));
    }
    if let Some(key) = &config.anthropic_api_key {
        backends.push(Arc::new(AnthropicClient::new(key.clone())?));
        info!("Anthropic model: {}", llm_client::anthropic::MODEL);
    }

    let generator = FallbackGenerator::new(backends);
    if generator.is_empty() {
        bail!("No LLM providers could be initialized");
    }
    Ok(generator)
}
