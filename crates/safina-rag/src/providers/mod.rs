//! Provider abstractions for the external services the pipeline consumes
//!
//! The LLM, the embedding model and the vector store sit behind traits so the
//! pipeline can be driven by hosted services in production and by in-process
//! fakes in tests.

pub mod chroma;
pub mod embedding;
pub mod groq;
pub mod llm;
pub mod ollama;
pub mod vector_store;

pub use chroma::ChromaStore;
pub use embedding::EmbeddingProvider;
pub use groq::GroqClient;
pub use llm::LlmProvider;
pub use ollama::OllamaEmbedder;
pub use vector_store::{VectorSearchResult, VectorStoreProvider};
