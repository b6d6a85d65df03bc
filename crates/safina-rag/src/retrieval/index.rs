//! Vector index composed from an embedding provider and a vector store

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::Chunk;

use super::RetrievalIndex;

/// Embeds the query, then asks the store for nearest neighbours
pub struct VectorIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
}

impl VectorIndex {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStoreProvider>) -> Self {
        Self { embedder, store }
    }
}

#[async_trait]
impl RetrievalIndex for VectorIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        // Nothing to embed; the answer stage runs without context
        if query.trim().is_empty() {
            tracing::debug!("Blank query, skipping retrieval");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&query_embedding, k).await?;

        if let Some(best) = results.first() {
            tracing::debug!(
                "Retrieved {} chunks from {} (best similarity {:.3})",
                results.len(),
                self.store.name(),
                best.similarity
            );
        }

        // Stores may over-fetch; the contract is at most k
        Ok(results.into_iter().take(k).map(|r| r.chunk).collect())
    }

    /// Healthy when both services answer and the store holds at least one chunk
    async fn health_check(&self) -> Result<bool> {
        if !self.embedder.health_check().await? || !self.store.health_check().await? {
            return Ok(false);
        }
        if self.store.is_empty().await? {
            tracing::warn!("Vector store {} is empty; index the catalog first", self.store.name());
            return Ok(false);
        }
        Ok(true)
    }

    fn name(&self) -> &str {
        "vector-index"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::VectorSearchResult;
    use parking_lot::Mutex;

    struct FixedEmbedder {
        calls: Mutex<Vec<String>>,
    }

    impl FixedEmbedder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.lock().push(text.to_string());
            if text == "unembeddable" {
                return Err(Error::embedding("model not loaded"));
            }
            Ok(vec![1.0, 0.0])
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct RecordingStore {
        requested_k: Mutex<Option<usize>>,
        results: Vec<VectorSearchResult>,
    }

    #[async_trait]
    impl VectorStoreProvider for RecordingStore {
        async fn search(&self, _query: &[f32], top_k: usize) -> Result<Vec<VectorSearchResult>> {
            *self.requested_k.lock() = Some(top_k);
            Ok(self.results.clone())
        }

        async fn len(&self) -> Result<usize> {
            Ok(self.results.len())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn result(text: &str, similarity: f32) -> VectorSearchResult {
        VectorSearchResult {
            chunk: Chunk::new(text, Some("catalog.pdf".to_string()), Some(1)),
            similarity,
        }
    }

    #[tokio::test]
    async fn test_search_passes_k_and_truncates() {
        let store = Arc::new(RecordingStore {
            requested_k: Mutex::new(None),
            results: vec![result("a", 0.9), result("b", 0.8), result("c", 0.7)],
        });
        let index = VectorIndex::new(FixedEmbedder::new(), store.clone());

        let chunks = index.search("red carpets", 2).await.unwrap();
        assert_eq!(*store.requested_k.lock(), Some(2));
        assert_eq!(chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let store = Arc::new(RecordingStore {
            requested_k: Mutex::new(None),
            results: vec![],
        });
        let index = VectorIndex::new(FixedEmbedder::new(), store.clone());

        let err = index.search("unembeddable", 4).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
        assert_eq!(*store.requested_k.lock(), None);
    }

    #[tokio::test]
    async fn test_blank_query_skips_embedding() {
        let embedder = FixedEmbedder::new();
        let store = Arc::new(RecordingStore {
            requested_k: Mutex::new(None),
            results: vec![result("a", 0.9)],
        });
        let index = VectorIndex::new(embedder.clone(), store.clone());

        assert!(index.search("", 4).await.unwrap().is_empty());
        assert!(index.search("  \n", 4).await.unwrap().is_empty());
        assert!(embedder.calls.lock().is_empty());
        assert_eq!(*store.requested_k.lock(), None);
    }

    #[tokio::test]
    async fn test_empty_store_is_not_healthy() {
        let empty = Arc::new(RecordingStore {
            requested_k: Mutex::new(None),
            results: vec![],
        });
        let index = VectorIndex::new(FixedEmbedder::new(), empty);
        assert!(!index.health_check().await.unwrap());

        let stocked = Arc::new(RecordingStore {
            requested_k: Mutex::new(None),
            results: vec![result("a", 0.9)],
        });
        let index = VectorIndex::new(FixedEmbedder::new(), stocked);
        assert!(index.health_check().await.unwrap());
    }
}
