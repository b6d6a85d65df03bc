//! Process-wide retrieval index handle, built on first use
//!
//! Construction (embedder client plus collection lookup) runs at most once at
//! a time: concurrent first requests wait on the same initialisation and all
//! observe the same handle. A failed construction leaves the cell empty, so a
//! later request retries once the index exists.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::{ChromaStore, OllamaEmbedder};
use crate::types::Chunk;

use super::{RetrievalIndex, VectorIndex};

type IndexFactory =
    Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn RetrievalIndex>>> + Send + Sync>;

/// Lazily constructed, shared retrieval index
pub struct LazyIndex {
    cell: OnceCell<Arc<dyn RetrievalIndex>>,
    factory: IndexFactory,
}

impl LazyIndex {
    /// Wrap an async constructor
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn RetrievalIndex>>> + Send + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(move || Box::pin(factory())),
        }
    }

    /// Ollama embeddings over the configured Chroma collection
    pub fn from_config(config: &RagConfig) -> Self {
        let embeddings = config.embeddings.clone();
        let vector_db = config.vector_db.clone();

        Self::new(move || {
            let embeddings = embeddings.clone();
            let vector_db = vector_db.clone();
            async move {
                tracing::info!(
                    "Initializing retrieval index (embeddings: {}, collection: {})",
                    embeddings.model,
                    vector_db.collection
                );
                let embedder = Arc::new(OllamaEmbedder::new(&embeddings)?);
                let store = Arc::new(ChromaStore::connect(&vector_db).await?);
                Ok::<_, Error>(Arc::new(VectorIndex::new(embedder, store)) as Arc<dyn RetrievalIndex>)
            }
        })
    }

    /// Get the shared handle, constructing it if this is the first use
    pub async fn get(&self) -> Result<Arc<dyn RetrievalIndex>> {
        self.cell
            .get_or_try_init(|| (self.factory)())
            .await
            .cloned()
    }

    /// Whether construction has completed
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

#[async_trait]
impl RetrievalIndex for LazyIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        self.get().await?.search(query, k).await
    }

    async fn health_check(&self) -> Result<bool> {
        match self.get().await {
            Ok(index) => index.health_check().await,
            Err(e) => {
                tracing::warn!("Retrieval index not available: {}", e);
                Ok(false)
            }
        }
    }

    fn name(&self) -> &str {
        "lazy-index"
    }
}
