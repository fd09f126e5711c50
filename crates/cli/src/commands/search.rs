//! Search command handler.
//!
//! One-shot retrieval: index the given paths, embed the query, and print
//! the closest chunks across every document.

use crate::session::{resolve_retrieval, CorpusSession};
use clap::Args;
use scholar_core::{config::AppConfig, AppResult};
use scholar_corpus::retrieve;
use std::path::PathBuf;

/// How much chunk text the human-readable listing shows.
const PREVIEW_LENGTH: usize = 200;

/// Find the chunks closest to a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Files, directories, or .zip archives to search
    #[arg(long, required = true)]
    pub path: Vec<PathBuf>,

    /// Number of chunks to retrieve
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

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let session = CorpusSession::open(self.path.clone(), config, self.chunk_size).await?;
        let options = resolve_retrieval(config, self.top_k, self.local_k);

        let results = retrieve(
            &self.query,
            session.provider(),
            session.registry(),
            &options,
        )
        .await?;

        if self.json {
            let output = serde_json::json!({
                "query": self.query,
                "results": results.iter().map(|result| serde_json::json!({
                    "document": result.document,
                    "position": result.position,
                    "distance": result.distance,
                    "text": result.text,
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        } else if results.is_empty() {
            println!("No matching chunks.");
        } else {
            for (rank, result) in results.iter().enumerate() {
                println!(
                    "{}. {} [chunk {}] (distance {:.4})",
                    rank + 1,
                    result.document,
                    result.position,
                    result.distance
                );
                println!("   {}", preview(&result.text));
            }
        }

        Ok(())
    }
}

/// First `PREVIEW_LENGTH` characters of a chunk, elided when truncated.
fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_LENGTH {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_LENGTH).collect();
    format!("{}...", cut.trim_end())
}
