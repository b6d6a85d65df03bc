//! Prompt templates for the chat pipeline

use crate::types::{ChatTurn, Chunk};

/// Persona for answer generation
pub const SYSTEM_PROMPT: &str = r#"You are the professional sales & heritage assistant for Safina Carpets.
- Use retrieved context faithfully; never invent specifications or prices.
- Keep answers concise, warm, and premium. Convert sizes accurately (ft <-> cm).
- If information is missing, say so and ask one targeted follow-up question.

Preferred spec block when applicable:
- Size: <feet & cm>
- Material: <fiber>
- Colors: <palette>
- Design: <style>
- Density: 150-170 KPSI
- Origin: Weaved in India, 100% Handmade (Hand Knotted)
- Pile Height: 10MM - 15MM
- Durability: Built to last for decades
- Perfect for: <rooms>
- Hypoallergenic, Eco-friendly, Mind relaxing or calming

Always end with 1-3 'Buying confidence' bullets (care tips or return policy if present).
If uncertain, say: "I may need a bit more detail or a photo to confirm."
"#;

/// System instruction for question condensation
pub const CONDENSE_QUESTION_PROMPT: &str = r#"Rewrite the latest user message as a standalone, concise query for retrieval.
Preserve sizes, materials, model names, and numbers. Return only the rewritten query.
"#;

/// Prompt builder for the chat pipeline
pub struct PromptBuilder;

impl PromptBuilder {
    /// Number retrieved chunks for the model: `[1] text`, blank line between
    ///
    /// The numbering only helps the model keep passages apart; it is never
    /// shown to the end user.
    pub fn build_context(chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| format!("[{}] {}", i + 1, chunk.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the grounded answer prompt
    pub fn build_answer_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Use ONLY the provided context to answer.

Context:
{context}

User question:
{question}

Write a helpful, brand-aligned answer (1-120 words). Add 1-3 short 'Buying confidence' bullets.
Do not show the sources or any [n] markers."#,
            context = context,
            question = question
        )
    }

    /// Build the condensation request from a history window and the latest user text
    ///
    /// Each turn is cut to `max_chars` characters and tagged with its role.
    pub fn build_condense_prompt(window: &[ChatTurn], latest_user: &str, max_chars: usize) -> String {
        let history = window
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str(), truncate_chars(&turn.content, max_chars)))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "History:\n{history}\n\nLatest: {latest}",
            history = history,
            latest = latest_user
        )
    }
}

/// First `max_chars` characters of `text` (char-boundary safe)
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_numbering() {
        let chunks = vec![
            Chunk::new("Red Persian rug, 5x8 ft", None, Some(2)),
            Chunk::new("Silk blend runner", None, Some(5)),
        ];
        let context = PromptBuilder::build_context(&chunks);
        assert_eq!(context, "[1] Red Persian rug, 5x8 ft\n\n[2] Silk blend runner");
        assert_eq!(PromptBuilder::build_context(&[]), "");
    }

    #[test]
    fn test_answer_prompt_embeds_context_and_question() {
        let prompt = PromptBuilder::build_answer_prompt("Do you have red carpets?", "[1] Red rug");
        assert!(prompt.contains("Context:\n[1] Red rug"));
        assert!(prompt.contains("User question:\nDo you have red carpets?"));
        assert!(prompt.contains("1-120 words"));
    }

    #[test]
    fn test_condense_prompt_truncates_turns() {
        let window = vec![
            ChatTurn::user("a".repeat(250)),
            ChatTurn::assistant("We have wool and silk."),
        ];
        let prompt = PromptBuilder::build_condense_prompt(&window, "What sizes?", 200);

        let first_line = prompt.lines().nth(1).unwrap();
        assert_eq!(first_line, format!("user: {}", "a".repeat(200)));
        assert!(prompt.contains("assistant: We have wool and silk."));
        assert!(prompt.ends_with("Latest: What sizes?"));
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("rug", 10), "rug");
        assert_eq!(truncate_chars("rug", 0), "");
    }
}
