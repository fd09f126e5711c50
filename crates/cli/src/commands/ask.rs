//! Ask command handler.
//!
//! Indexes the given paths, retrieves context for the question, and
//! prints the generated answer with its source attributions.

use crate::session::{resolve_retrieval, CorpusSession};
use clap::Args;
use scholar_core::{config::AppConfig, AppResult};
use scholar_corpus::{answer_question, AnswerOptions};
use scholar_llm::create_client;
use std::path::PathBuf;

/// Ask a single question over indexed documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Files, directories, or .zip archives to answer from
    #[arg(long, required = true)]
    pub path: Vec<PathBuf>,

    /// Number of chunks to ground the answer on
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Candidates requested from each document before the merge
    #[arg(long)]
    pub local_k: Option<usize>,

    /// Words per chunk (200-800)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let session = CorpusSession::open(self.path.clone(), config, self.chunk_size).await?;
        let llm = create_client(&config.llm, config.resolve_api_key())?;

        let options = AnswerOptions {
            model: config.llm.model.clone(),
            retrieval: resolve_retrieval(config, self.top_k, self.local_k),
        };

        let answer = answer_question(
            &self.question,
            session.registry(),
            session.provider(),
            llm.as_ref(),
            &[],
            &options,
        )
        .await?;

        if self.json {
            let output = serde_json::json!({
                "question": self.question,
                "answer": answer.text,
                "model": answer.model,
                "sources": answer.sources.iter().map(|source| serde_json::json!({
                    "document": source.document,
                    "position": source.position,
                    "distance": source.distance,
                    "snippet": source.snippet,
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        } else {
            println!("{}", answer.text);

            if !answer.sources.is_empty() {
                println!();
                println!("Sources:");
                for source in &answer.sources {
                    println!(
                        "- {} [chunk {}] (distance {:.4})",
                        source.document, source.position, source.distance
                    );
                }
            }
        }

        Ok(())
    }
}
