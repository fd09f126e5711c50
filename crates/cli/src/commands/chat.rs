//! Chat command handler.
//!
//! Interactive question answering over an indexed corpus. The session
//! holds the conversation in memory, feeds it back into every prompt,
//! and clears it whenever the corpus is reindexed.

use crate::session::{resolve_retrieval, CorpusSession};
use clap::Args;
use scholar_core::{config::AppConfig, AppResult};
use scholar_corpus::{answer_question, AnswerOptions};
use scholar_llm::create_client;
use scholar_prompt::ChatTurn;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Chat over indexed documents with conversation memory
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Files, directories, or .zip archives to answer from
    #[arg(long, required = true)]
    pub path: Vec<PathBuf>,

    /// Number of chunks to ground each answer on
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Candidates requested from each document before the merge
    #[arg(long)]
    pub local_k: Option<usize>,

    /// Words per chunk (200-800)
    #[arg(long)]
    pub chunk_size: Option<usize>,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let mut session = CorpusSession::open(self.path.clone(), config, self.chunk_size).await?;
        let llm = create_client(&config.llm, config.resolve_api_key())?;

        let options = AnswerOptions {
            model: config.llm.model.clone(),
            retrieval: resolve_retrieval(config, self.top_k, self.local_k),
        };

        let report = session.registry().report();
        println!(
            "Indexed {} documents ({} chunks). Ask away, or /help for commands.",
            report.indexed.len(),
            report.total_chunks()
        );

        let mut history: Vec<ChatTurn> = Vec::new();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            // EOF ends the session, same as /quit
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match input {
                "/quit" | "/exit" => break,
                "/help" => print_help(),
                "/stats" => print_stats(&session),
                "/reload" => match session.reload().await {
                    Ok(report) => {
                        history.clear();
                        println!(
                            "Reindexed {} documents ({} chunks); conversation cleared.",
                            report.indexed.len(),
                            report.total_chunks()
                        );
                    }
                    Err(e) => println!("Reload failed: {}", e),
                },
                other if other.starts_with('/') => {
                    println!("Unknown command: {}. /help lists commands.", other);
                }
                question => {
                    let result = answer_question(
                        question,
                        session.registry(),
                        session.provider(),
                        llm.as_ref(),
                        &history,
                        &options,
                    )
                    .await;

                    match result {
                        Ok(answer) => {
                            println!("{}", answer.text);
                            history.push(ChatTurn::user(question));
                            history.push(ChatTurn::bot(answer.text));
                        }
                        Err(e) => {
                            tracing::error!("Answer failed: {}", e);
                            println!("Error: {}", e);
                        }
                    }
                }
            }
        }

        println!("Bye.");
        Ok(())
    }
}

fn print_help() {
    println!("/reload  reindex the corpus and clear the conversation");
    println!("/stats   show what is indexed");
    println!("/quit    leave the chat");
}

fn print_stats(session: &CorpusSession) {
    let report = session.registry().report();
    println!(
        "{} documents, {} chunks, chunk size {} words",
        report.indexed.len(),
        report.total_chunks(),
        session.chunk_size()
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
        println!("Skipped: {} (see the indexing log for reasons)", report.skipped.len());
    }
}
