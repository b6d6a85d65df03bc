//! Grounded answer generation

use std::sync::Arc;

use crate::error::Result;
use crate::generation::prompt::{PromptBuilder, SYSTEM_PROMPT};
use crate::providers::LlmProvider;
use crate::types::{ChatMessage, Chunk};

/// Answers the question from retrieved context
pub struct AnswerGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Reads `question` and `context_docs`; produces the answer
    ///
    /// Length and bullet guidance live in the prompt only; the reply is
    /// returned trimmed but otherwise as the model wrote it.
    pub async fn generate(&self, question: &str, context_docs: &[Chunk]) -> Result<String> {
        let context = PromptBuilder::build_context(context_docs);
        let prompt = PromptBuilder::build_answer_prompt(question, &context);

        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let answer = self.llm.complete(&messages).await?;

        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pipeline::testing::ScriptedLlm;
    use crate::types::MessageRole;

    #[tokio::test]
    async fn test_prompt_carries_numbered_context() {
        let llm = Arc::new(ScriptedLlm::replies(["\nYes, we stock red rugs.\n"]));
        let generator = AnswerGenerator::new(llm.clone());
        let docs = vec![
            Chunk::new("Crimson Heriz, 6x9 ft", Some("catalog.pdf".to_string()), Some(2)),
            Chunk::new("Ruby runner, 2.5x10 ft", Some("catalog.pdf".to_string()), Some(5)),
        ];

        let answer = generator.generate("red carpets", &docs).await.unwrap();
        assert_eq!(answer, "Yes, we stock red rugs.");

        let calls = llm.calls();
        assert_eq!(calls[0][0].role(), MessageRole::System);
        assert_eq!(calls[0][0].content(), SYSTEM_PROMPT);
        let prompt = calls[0][1].content();
        assert!(prompt.contains("[1] Crimson Heriz, 6x9 ft\n\n[2] Ruby runner, 2.5x10 ft"));
        assert!(prompt.contains("User question:\nred carpets"));
    }

    #[tokio::test]
    async fn test_no_context_still_asks_model() {
        let llm = Arc::new(ScriptedLlm::replies(["I may need a bit more detail."]));
        let answer = AnswerGenerator::new(llm.clone()).generate("", &[]).await.unwrap();
        assert_eq!(answer, "I may need a bit more detail.");
        assert_eq!(llm.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let llm = Arc::new(ScriptedLlm::new(vec![Err(Error::llm("timeout"))]));
        let err = AnswerGenerator::new(llm).generate("q", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
    }
}
