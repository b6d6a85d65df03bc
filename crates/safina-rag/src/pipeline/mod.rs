//! Conversational retrieval pipeline
//!
//! Three stages run strictly in sequence for each chat turn:
//!
//! 1. condense: history -> standalone question
//! 2. retrieve: question -> context chunks + sources
//! 3. answer:   question + context -> answer
//!
//! Each stage takes its inputs by reference and returns its output; the
//! orchestrator records outputs on the request's [`RequestState`], which
//! rejects out-of-order writes. Any stage failure aborts the request and the
//! partially filled state is dropped.

pub mod answer;
pub mod condense;
pub mod retrieve;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::providers::LlmProvider;
use crate::retrieval::RetrievalIndex;
use crate::types::{ChatResponse, ChatTurn};

pub use answer::AnswerGenerator;
pub use condense::QuestionCondenser;
pub use retrieve::{ContextRetriever, Retrieval};
pub use state::{PipelinePhase, RequestState};

/// Condense -> Retrieve -> Answer
pub struct ChatPipeline {
    condenser: QuestionCondenser,
    retriever: ContextRetriever,
    generator: AnswerGenerator,
}

impl ChatPipeline {
    /// Build the pipeline over a shared LLM and retrieval index
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        index: Arc<dyn RetrievalIndex>,
        policy: &PipelineConfig,
    ) -> Self {
        Self {
            condenser: QuestionCondenser::new(
                Arc::clone(&llm),
                policy.history_turns,
                policy.history_turn_chars,
            ),
            retriever: ContextRetriever::new(index, policy.top_k, policy.max_sources),
            generator: AnswerGenerator::new(llm),
        }
    }

    /// Answer `message` given the prior `history`
    pub async fn chat(
        &self,
        session_id: impl Into<String>,
        history: Vec<ChatTurn>,
        message: impl Into<String>,
    ) -> Result<ChatResponse> {
        self.run(RequestState::for_message(session_id, history, message))
            .await
    }

    /// Drive a fresh request state to completion
    pub async fn run(&self, mut state: RequestState) -> Result<ChatResponse> {
        let start = Instant::now();
        let request_id = Uuid::new_v4();

        state.begin()?;
        tracing::info!(
            "[{}] session={} chat turn ({} history turns)",
            request_id,
            state.session_id(),
            state.history().len()
        );

        let question = self
            .condenser
            .condense(state.history())
            .await
            .inspect_err(|e| tracing::warn!("[{}] condense failed: {}", request_id, e))?;
        state.record_question(question)?;
        tracing::info!("[{}] condensed question: \"{}\"", request_id, state.question());

        let retrieval = self
            .retriever
            .retrieve(state.question())
            .await
            .inspect_err(|e| tracing::warn!("[{}] retrieve failed: {}", request_id, e))?;
        state.record_retrieval(retrieval)?;

        let answer = self
            .generator
            .generate(state.question(), state.context_docs())
            .await
            .inspect_err(|e| tracing::warn!("[{}] answer failed: {}", request_id, e))?;
        state.record_answer(answer)?;

        let outcome = state.into_outcome()?;
        tracing::info!(
            "[{}] completed in {}ms, {} sources",
            request_id,
            start.elapsed().as_millis(),
            outcome.sources.len()
        );

        Ok(outcome)
    }
}
