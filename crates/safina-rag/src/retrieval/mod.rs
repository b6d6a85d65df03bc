//! Retrieval index: query text in, ranked chunks out

pub mod index;
pub mod lazy;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Chunk;

pub use index::VectorIndex;
pub use lazy::LazyIndex;

/// Narrow interface the pipeline uses to find supporting passages
#[async_trait]
pub trait RetrievalIndex: Send + Sync {
    /// Return up to `k` chunks most similar to `query`, best first
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Chunk>>;

    /// Check that the index can be queried
    async fn health_check(&self) -> Result<bool>;

    /// Get index name for logging
    fn name(&self) -> &str;
}
