//! Index command handler.
//!
//! Builds a registry from the given paths and prints the build report.

use crate::session::CorpusSession;
use clap::Args;
use scholar_core::{config::AppConfig, AppResult};
use scholar_corpus::BuildReport;
use std::path::PathBuf;

/// Index documents and print the build report
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Files, directories, or .zip archives to index
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Words per chunk (200-800)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing index command for {} path(s)", self.paths.len());

        let session = CorpusSession::open(self.paths.clone(), config, self.chunk_size).await?;
        let report = session.registry().report();

        if self.json {
            let output = serde_json::json!({
                "documentCount": report.indexed.len(),
                "chunkCount": report.total_chunks(),
                "dimension": report.dimension,
                "provider": report.provider,
                "model": report.model,
                "durationSecs": report.duration_secs,
                "indexed": report.indexed.iter().map(|doc| serde_json::json!({
                    "name": doc.name,
                    "chunks": doc.chunks,
                })).collect::<Vec<_>>(),
                "skipped": report.skipped.iter().map(|skip| serde_json::json!({
                    "name": skip.name,
                    "reason": skip.reason,
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        } else {
            print_report(report);
        }

        Ok(())
    }
}

/// Render a build report for humans.
fn print_report(report: &BuildReport) {
    println!(
        "Indexed {} documents ({} chunks) in {:.2}s",
        report.indexed.len(),
        report.total_chunks(),
        report.duration_secs
    );
    if let Some(dimension) = report.dimension {
        println!(
            "Embeddings: {} ({}), dimension {}",
            report.provider, report.model, dimension
        );
    }
    for doc in &report.indexed {
        println!("- {} ({} chunks)", doc.name, doc.chunks);
    }

    if !report.skipped.is_empty() {
        println!();
        println!("Skipped:");
        for skip in &report.skipped {
            println!("- {}: {}", skip.name, skip.reason);
        }
    }
}
