//! Context retrieval and source extraction

use std::sync::Arc;

use crate::error::Result;
use crate::retrieval::RetrievalIndex;
use crate::types::{Chunk, Source};

/// Output of the retrieval stage
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    /// All returned chunks, best first
    pub context_docs: Vec<Chunk>,
    /// Provenance of the leading chunks, same order, not deduplicated
    pub sources: Vec<Source>,
}

/// Queries the retrieval index with the condensed question
pub struct ContextRetriever {
    index: Arc<dyn RetrievalIndex>,
    top_k: usize,
    max_sources: usize,
}

impl ContextRetriever {
    pub fn new(index: Arc<dyn RetrievalIndex>, top_k: usize, max_sources: usize) -> Self {
        Self {
            index,
            top_k,
            max_sources,
        }
    }

    /// Reads `question`; produces `context_docs` and `sources`
    pub async fn retrieve(&self, question: &str) -> Result<Retrieval> {
        let context_docs = self.index.search(question, self.top_k).await?;
        let sources = sources_for(&context_docs, self.max_sources);

        tracing::debug!(
            "Retrieved {} chunks from {}, {} sources",
            context_docs.len(),
            self.index.name(),
            sources.len()
        );

        Ok(Retrieval {
            context_docs,
            sources,
        })
    }
}

/// Source list for the first `max_sources` chunks
pub fn sources_for(chunks: &[Chunk], max_sources: usize) -> Vec<Source> {
    chunks
        .iter()
        .take(max_sources)
        .map(Source::from_chunk)
        .collect()
}
