//! Core types for the chat backend

pub mod chat;
pub mod document;
pub mod response;

pub use chat::{ChatMessage, ChatTurn, MessageRole, TurnRole};
pub use document::{Chunk, ChunkMetadata};
pub use response::{ChatRequest, ChatResponse, Source};
