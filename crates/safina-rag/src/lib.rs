//! safina-rag: conversational RAG chat backend for the Safina Carpets catalog
//!
//! Each chat turn runs a three-stage pipeline: the conversation is condensed
//! into a standalone question, supporting catalog passages are retrieved from
//! a vector index, and a hosted LLM writes a grounded answer. The caller gets
//! the answer plus up to three source references.

pub mod config;
pub mod error;
pub mod generation;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::ChatPipeline;
pub use types::{ChatMessage, ChatRequest, ChatResponse, ChatTurn, Chunk, Source};
