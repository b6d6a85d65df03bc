//! Question condensation: chat history to standalone retrieval query

use std::sync::Arc;

use crate::error::Result;
use crate::generation::prompt::{PromptBuilder, CONDENSE_QUESTION_PROMPT};
use crate::providers::LlmProvider;
use crate::types::{ChatMessage, ChatTurn};

/// Rewrites the latest user turn into a standalone query
pub struct QuestionCondenser {
    llm: Arc<dyn LlmProvider>,
    history_turns: usize,
    turn_chars: usize,
}

impl QuestionCondenser {
    pub fn new(llm: Arc<dyn LlmProvider>, history_turns: usize, turn_chars: usize) -> Self {
        Self {
            llm,
            history_turns,
            turn_chars,
        }
    }

    /// Reads `history`; produces the question
    ///
    /// An empty model reply falls back to the latest user message. A history
    /// with no user turn condenses against an empty latest message rather
    /// than failing.
    pub async fn condense(&self, history: &[ChatTurn]) -> Result<String> {
        let latest_user = history
            .iter()
            .rev()
            .find(|turn| turn.is_user())
            .map(|turn| turn.content.as_str())
            .unwrap_or_else(|| {
                tracing::warn!("No user turn in history; condensing an empty message");
                ""
            });

        let window_start = history.len().saturating_sub(self.history_turns);
        let instruction =
            PromptBuilder::build_condense_prompt(&history[window_start..], latest_user, self.turn_chars);

        let messages = [
            ChatMessage::system(CONDENSE_QUESTION_PROMPT),
            ChatMessage::user(instruction),
        ];
        let rewritten = self.llm.complete(&messages).await?;
        let rewritten = rewritten.trim();

        if rewritten.is_empty() {
            tracing::debug!("Condenser returned nothing; using latest user message");
            return Ok(latest_user.to_string());
        }

        Ok(rewritten.to_string())
    }
}
