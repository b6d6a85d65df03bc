//! In-process fakes for pipeline tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use crate::retrieval::RetrievalIndex;
use crate::types::{ChatMessage, Chunk};

/// LLM that replays scripted replies and records every request
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().push(messages.to_vec());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(Error::llm("no scripted reply left")))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Index returning a fixed ranked list, or failing as unavailable
pub struct FixedIndex {
    chunks: Option<Vec<Chunk>>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl FixedIndex {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self {
            chunks: Some(chunks),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            chunks: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl RetrievalIndex for FixedIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        self.queries.lock().push((query.to_string(), k));
        match &self.chunks {
            Some(chunks) => Ok(chunks.iter().take(k).cloned().collect()),
            None => Err(Error::index_unavailable("collection 'safina_carpets' does not exist")),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.chunks.is_some())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
