//! Per-request pipeline state
//!
//! Each field is written by exactly one stage, in order. Writes are checked
//! against the current phase, so a stage running twice or out of order is an
//! error instead of a silent overwrite.

use std::fmt;

use crate::error::{Error, Result};
use crate::types::{ChatResponse, ChatTurn, Chunk, Source};

use super::retrieve::Retrieval;

/// Position of a request in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Start,
    Condensing,
    Retrieving,
    Answering,
    Done,
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Condensing => "condensing",
            Self::Retrieving => "retrieving",
            Self::Answering => "answering",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// State threaded through one chat request
#[derive(Debug)]
pub struct RequestState {
    session_id: String,
    history: Vec<ChatTurn>,
    question: String,
    context_docs: Vec<Chunk>,
    answer: String,
    sources: Vec<Source>,
    phase: PipelinePhase,
}

impl RequestState {
    /// Fresh state over an existing history
    pub fn new(session_id: impl Into<String>, history: Vec<ChatTurn>) -> Self {
        Self {
            session_id: session_id.into(),
            history,
            question: String::new(),
            context_docs: Vec::new(),
            answer: String::new(),
            sources: Vec::new(),
            phase: PipelinePhase::Start,
        }
    }

    /// Fresh state with `message` appended as the newest user turn
    pub fn for_message(
        session_id: impl Into<String>,
        mut history: Vec<ChatTurn>,
        message: impl Into<String>,
    ) -> Self {
        history.push(ChatTurn::user(message));
        Self::new(session_id, history)
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn context_docs(&self) -> &[Chunk] {
        &self.context_docs
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    fn transition(&mut self, from: PipelinePhase, to: PipelinePhase) -> Result<()> {
        if self.phase != from {
            return Err(Error::pipeline(format!(
                "cannot move to {} from {} (expected {})",
                to, self.phase, from
            )));
        }
        self.phase = to;
        Ok(())
    }

    /// Start -> Condensing
    pub fn begin(&mut self) -> Result<()> {
        self.transition(PipelinePhase::Start, PipelinePhase::Condensing)
    }

    /// Condensing -> Retrieving, writing `question`
    pub fn record_question(&mut self, question: String) -> Result<()> {
        self.transition(PipelinePhase::Condensing, PipelinePhase::Retrieving)?;
        self.question = question;
        Ok(())
    }

    /// Retrieving -> Answering, writing `context_docs` and `sources`
    pub fn record_retrieval(&mut self, retrieval: Retrieval) -> Result<()> {
        self.transition(PipelinePhase::Retrieving, PipelinePhase::Answering)?;
        self.context_docs = retrieval.context_docs;
        self.sources = retrieval.sources;
        Ok(())
    }

    /// Answering -> Done, writing `answer`
    pub fn record_answer(&mut self, answer: String) -> Result<()> {
        self.transition(PipelinePhase::Answering, PipelinePhase::Done)?;
        self.answer = answer;
        Ok(())
    }

    /// The caller-visible result; only available once the pipeline is done
    pub fn into_outcome(self) -> Result<ChatResponse> {
        if self.phase != PipelinePhase::Done {
            return Err(Error::pipeline(format!(
                "no outcome while still {}",
                self.phase
            )));
        }
        Ok(ChatResponse {
            answer: self.answer,
            sources: self.sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retrieval() -> Retrieval {
        Retrieval {
            context_docs: vec![Chunk::new("Red rug", Some("catalog.pdf".to_string()), Some(2))],
            sources: vec![Source {
                file: "catalog.pdf".to_string(),
                page: "2".to_string(),
            }],
        }
    }

    #[test]
    fn test_for_message_appends_user_turn() {
        let state = RequestState::for_message(
            "s1",
            vec![ChatTurn::assistant("Welcome to Safina Carpets")],
            "Do you have red carpets?",
        );
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[1], ChatTurn::user("Do you have red carpets?"));
        assert_eq!(state.phase(), PipelinePhase::Start);
        assert!(state.question().is_empty());
        assert!(state.sources().is_empty());
    }

    #[test]
    fn test_linear_walk() {
        let mut state = RequestState::new("s1", vec![ChatTurn::user("red?")]);
        state.begin().unwrap();
        state.record_question("red carpets".to_string()).unwrap();
        state.record_retrieval(retrieval()).unwrap();
        state.record_answer("Yes, we do.".to_string()).unwrap();
        assert_eq!(state.phase(), PipelinePhase::Done);

        let outcome = state.into_outcome().unwrap();
        assert_eq!(outcome.answer, "Yes, we do.");
        assert_eq!(outcome.sources.len(), 1);
    }

    #[test]
    fn test_fields_are_write_once() {
        let mut state = RequestState::new("s1", vec![]);
        state.begin().unwrap();
        state.record_question("first".to_string()).unwrap();

        let err = state.record_question("second".to_string()).unwrap_err();
        assert!(matches!(err, Error::Pipeline(_)));
        assert_eq!(state.question(), "first");

        assert!(state.begin().is_err());
    }

    #[test]
    fn test_out_of_order_write_rejected() {
        let mut state = RequestState::new("s1", vec![]);
        assert!(state.record_retrieval(retrieval()).is_err());
        assert!(state.record_answer("early".to_string()).is_err());
        assert!(state.context_docs().is_empty());
        assert!(state.answer().is_empty());
    }

    #[test]
    fn test_no_partial_outcome() {
        let mut state = RequestState::new("s1", vec![]);
        state.begin().unwrap();
        state.record_question("q".to_string()).unwrap();
        state.record_retrieval(retrieval()).unwrap();

        assert!(matches!(state.into_outcome(), Err(Error::Pipeline(_))));
    }
}
