//! LLM provider trait for chat completions

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ChatMessage;

/// Trait for hosted chat-completion models
///
/// Implementations:
/// - `GroqClient`: Groq OpenAI-compatible API (llama-3.3-70b-versatile)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete an ordered conversation and return the generated text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
