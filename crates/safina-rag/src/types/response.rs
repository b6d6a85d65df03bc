//! Request and response bodies for the chat endpoint

use serde::{Deserialize, Serialize};

use super::chat::ChatTurn;
use super::document::Chunk;

/// A source reference returned alongside an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Source file name (no directories)
    pub file: String,
    /// Page number, or "n/a"
    pub page: String,
}

impl Source {
    /// Render a chunk's provenance
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            file: chunk.file_name().to_string(),
            page: chunk.page_label(),
        }
    }
}

/// POST /chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Opaque session identifier, echoed into logs only
    pub session_id: String,
    /// The new user message
    pub message: String,
    /// Prior turns, oldest first (absent and null both mean none)
    #[serde(default)]
    pub history: Option<Vec<ChatTurn>>,
}

/// POST /chat response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<Source>,
}
