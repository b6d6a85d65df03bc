//! Chat server binary
//!
//! Run with: cargo run -p safina-rag --bin safina-rag-server

use safina_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before reading configuration
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safina_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credentials are fatal before the listener binds
    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM: {} ({})", config.llm.model, config.llm.base_url);
    tracing::info!(
        "  - Embeddings: {} ({})",
        config.embeddings.model,
        config.embeddings.base_url
    );
    tracing::info!(
        "  - Vector store: {} ({})",
        config.vector_db.collection,
        config.vector_db.base_url
    );
    tracing::info!(
        "  - Pipeline: history {}x{} chars, top_k {}, max sources {}",
        config.pipeline.history_turns,
        config.pipeline.history_turn_chars,
        config.pipeline.top_k,
        config.pipeline.max_sources
    );

    let server = RagServer::new(config)?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST http://{}/chat   - Ask a question", server.address());
    tracing::info!("  GET  http://{}/health - Liveness", server.address());
    tracing::info!("  GET  http://{}/ready  - Retrieval index reachable", server.address());

    server.start().await?;

    Ok(())
}
