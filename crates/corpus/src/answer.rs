//! Question answering over the indexed corpus.
//!
//! Ties retrieval, prompt assembly, and the generative model together:
//! retrieve the closest chunks, lay them into the analyst prompt with
//! the conversation so far, and hand the result to the model.

use crate::embeddings::EmbeddingProvider;
use crate::registry::IndexRegistry;
use crate::retriever::{retrieve, RetrievalOptions};
use crate::types::RetrievalResult;
use scholar_core::AppResult;
use scholar_llm::{LlmClient, LlmRequest};
use scholar_prompt::{build_prompt, ChatTurn, ContextPassage};
use serde::Serialize;

/// Maximum snippet length for source references.
const MAX_SNIPPET_LENGTH: usize = 150;

/// Generation temperature for grounded answering.
const ANSWER_TEMPERATURE: f32 = 0.3;

/// Token ceiling for a single answer.
const ANSWER_MAX_TOKENS: u32 = 1000;

/// The reply used when retrieval produces nothing to ground an answer.
pub const NO_CONTEXT_ANSWER: &str = "I'm sorry, the answer to your question is not found in the \
     uploaded articles. Please upload a more comprehensive article.";

/// Knobs for one answering pass.
#[derive(Debug, Clone)]
pub struct AnswerOptions {
    /// Generative model identifier
    pub model: String,

    /// Retrieval configuration feeding the prompt
    pub retrieval: RetrievalOptions,
}

/// An answer with the passages that grounded it.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Model-generated answer text
    pub text: String,

    /// Chunks the prompt was grounded on, in rank order
    pub sources: Vec<SourceRef>,

    /// Model that produced the answer
    pub model: String,
}

/// Human-readable reference to a retrieved chunk.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    /// Document the chunk came from
    pub document: String,

    /// Chunk position within the document
    pub position: usize,

    /// Squared distance to the query
    pub distance: f32,

    /// Leading text of the chunk
    pub snippet: String,
}

/// Answer a question using the registry as the only knowledge source.
///
/// With nothing retrieved the model is never called; the caller gets
/// the standing refusal instead. History turns are laid into the
/// prompt as-is, oldest first.
pub async fn answer_question(
    question: &str,
    registry: &IndexRegistry,
    embedder: &dyn EmbeddingProvider,
    llm: &dyn LlmClient,
    history: &[ChatTurn],
    options: &AnswerOptions,
) -> AppResult<Answer> {
    let results = retrieve(question, embedder, registry, &options.retrieval).await?;

    if results.is_empty() {
        tracing::info!("No chunks retrieved; answering without a model call");
        return Ok(Answer {
            text: NO_CONTEXT_ANSWER.to_string(),
            sources: Vec::new(),
            model: options.model.clone(),
        });
    }

    let passages: Vec<ContextPassage> = results
        .iter()
        .map(|r| ContextPassage::new(&r.document, &r.text))
        .collect();
    let prompt = build_prompt(question, &passages, history)?;

    tracing::debug!(
        "Prompting '{}' with {} passages ({} prompt chars)",
        options.model,
        passages.len(),
        prompt.len()
    );

    let request = LlmRequest::new(prompt, &options.model)
        .with_temperature(ANSWER_TEMPERATURE)
        .with_max_tokens(ANSWER_MAX_TOKENS);
    let response = llm.complete(&request).await?;

    Ok(Answer {
        text: response.content,
        sources: make_source_refs(&results),
        model: response.model,
    })
}

fn make_source_refs(results: &[RetrievalResult]) -> Vec<SourceRef> {
    results
        .iter()
        .map(|r| SourceRef {
            document: r.document.clone(),
            position: r.position,
            distance: r.distance,
            snippet: snippet_of(&r.text),
        })
        .collect()
}

/// First `MAX_SNIPPET_LENGTH` characters of a chunk, elided if cut.
fn snippet_of(text: &str) -> String {
    if text.chars().count() <= MAX_SNIPPET_LENGTH {
        return text.to_string();
    }
    let mut snippet: String = text.chars().take(MAX_SNIPPET_LENGTH).collect();
    snippet.push_str("...");
    snippet
}
