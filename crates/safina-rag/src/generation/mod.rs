//! Prompt construction for condensation and grounded answers

pub mod prompt;

pub use prompt::PromptBuilder;
