//! Application state for the chat server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::pipeline::ChatPipeline;
use crate::providers::{GroqClient, LlmProvider};
use crate::retrieval::{LazyIndex, RetrievalIndex};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Chat pipeline (owns its stage clients)
    pipeline: ChatPipeline,
    /// Retrieval index handle, shared with the pipeline
    index: Arc<dyn RetrievalIndex>,
}

impl AppState {
    /// Create application state from configuration
    ///
    /// The LLM client is built eagerly; the retrieval index connects on first
    /// use so the server can start before the vector store is populated.
    pub fn new(config: &RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let llm: Arc<dyn LlmProvider> = Arc::new(GroqClient::new(&config.llm)?);
        tracing::info!("LLM provider initialized ({} / {})", llm.name(), llm.model());

        let index: Arc<dyn RetrievalIndex> = Arc::new(LazyIndex::from_config(config));
        tracing::info!(
            "Retrieval index registered (collection '{}', connects on first use)",
            config.vector_db.collection
        );

        Ok(Self::from_parts(llm, index, config))
    }

    /// Assemble state from already-built providers
    pub fn from_parts(
        llm: Arc<dyn LlmProvider>,
        index: Arc<dyn RetrievalIndex>,
        config: &RagConfig,
    ) -> Self {
        let pipeline = ChatPipeline::new(llm, Arc::clone(&index), &config.pipeline);
        Self {
            inner: Arc::new(AppStateInner { pipeline, index }),
        }
    }

    pub fn pipeline(&self) -> &ChatPipeline {
        &self.inner.pipeline
    }

    /// Ready when the retrieval index can be queried
    pub async fn is_ready(&self) -> bool {
        self.inner.index.health_check().await.unwrap_or(false)
    }
}
