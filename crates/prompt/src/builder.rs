//! Prompt builder for the answering pipeline.
//!
//! Assembles the full prompt sent to the generative model: an instruction
//! header, one article block per retrieved passage, the conversation
//! transcript, and a trailing answer cue.

use crate::types::{ChatTurn, ContextPassage};
use handlebars::Handlebars;
use scholar_core::{AppError, AppResult};
use serde::Serialize;

/// Standing instruction for the article analyst persona.
///
/// The refusal sentence is load-bearing: the model is told to emit it
/// verbatim when the articles do not contain the answer, so downstream
/// consumers can recognize a non-answer.
pub const ANSWER_INSTRUCTION: &str = "You are an expert article analyst with human-level understanding. Your role is to carefully read and analyze the provided articles and answer the user's questions solely based on the information contained within those articles. When responding, please ensure your answers are detailed, well-structured, and elegant. You may use bullet points, numbered lists, tables, or examples to clarify your explanations. If the question is ambiguous, ask clarifying questions before responding. If the answer to a question cannot be found in the articles, do not fabricate any information; instead, respond with: \"I'm sorry, the answer to your question is not found in the uploaded articles. Please upload a more comprehensive article.\" Always ensure that your responses strictly reflect the content of the provided articles and cite the relevant sections when applicable.";

/// Handlebars layout of the final prompt. Whitespace is deliberate: article
/// blocks are separated by blank lines and the transcript ends with a blank
/// line before the answer cue.
const PROMPT_TEMPLATE: &str = "Instruction:
{{instruction}}

Article content:
{{#each articles}}Article ({{source}}):
{{text}}{{#unless @last}}

{{/unless}}{{/each}}

Conversation:
{{#each turns}}{{role}}: {{content}}
{{/each}}User: {{question}}

Answer:";

/// Template variables for [`PROMPT_TEMPLATE`].
#[derive(Debug, Serialize)]
struct PromptData<'a> {
    instruction: &'a str,
    articles: &'a [ContextPassage],
    turns: &'a [ChatTurn],
    question: &'a str,
}

/// Build the answering prompt from a question, retrieved passages, and the
/// conversation so far.
///
/// # Example
/// ```
/// use scholar_prompt::{build_prompt, ContextPassage};
///
/// let passages = vec![ContextPassage::new("paper.pdf", "The cat sat on the mat.")];
/// let prompt = build_prompt("Where did the cat sit?", &passages, &[]).unwrap();
/// assert!(prompt.contains("Article (paper.pdf):"));
/// ```
pub fn build_prompt(
    question: &str,
    passages: &[ContextPassage],
    history: &[ChatTurn],
) -> AppResult<String> {
    build_prompt_with_instruction(ANSWER_INSTRUCTION, question, passages, history)
}

/// Build the answering prompt with a custom instruction header.
pub fn build_prompt_with_instruction(
    instruction: &str,
    question: &str,
    passages: &[ContextPassage],
    history: &[ChatTurn],
) -> AppResult<String> {
    tracing::debug!(
        passages = passages.len(),
        turns = history.len(),
        "Building answering prompt"
    );

    let data = PromptData {
        instruction,
        articles: passages,
        turns: history,
        question,
    };

    render_template(PROMPT_TEMPLATE, &data)
}

/// Render a Handlebars template with the given data.
fn render_template<T: Serialize>(template: &str, data: &T) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text, never HTML
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", data)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_prompt_layout() {
        let passages = vec![
            ContextPassage::new("a.pdf", "alpha body"),
            ContextPassage::new("b.pdf", "beta body"),
        ];
        let history = vec![ChatTurn::user("first question"), ChatTurn::bot("first answer")];

        let prompt =
            build_prompt_with_instruction("Answer carefully.", "second question", &passages, &history)
                .unwrap();

        let expected = "Instruction:\nAnswer carefully.\n\n\
                        Article content:\n\
                        Article (a.pdf):\nalpha body\n\n\
                        Article (b.pdf):\nbeta body\n\n\
                        Conversation:\n\
                        User: first question\n\
                        Bot: first answer\n\
                        User: second question\n\n\
                        Answer:";
        assert_eq!(prompt, expected);
    }

    #[test]
    fn test_prompt_without_history_or_passages() {
        let prompt = build_prompt("lonely question", &[], &[]).unwrap();

        assert!(prompt.starts_with("Instruction:\n"));
        assert!(prompt.contains("Article content:\n"));
        assert!(prompt.contains("\nUser: lonely question\n"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_default_instruction_included() {
        let prompt = build_prompt("q", &[], &[]).unwrap();
        assert!(prompt.contains("expert article analyst"));
    }

    #[test]
    fn test_escaping_disabled() {
        let passages = vec![ContextPassage::new("a.pdf", "<b>bold & raw</b>")];
        let prompt = build_prompt("q", &passages, &[]).unwrap();
        assert!(prompt.contains("<b>bold & raw</b>"));
    }
}
