//! Multi-document retrieval over article corpora.
//!
//! Turns a set of documents into per-document vector indices and
//! answers queries across all of them: word-exact segmentation, one
//! batched embedding call per document, flat squared-L2 search, and a
//! distance-ordered cross-document merge feeding the answer prompt.

pub mod answer;
pub mod archive;
pub mod embeddings;
pub mod extract;
pub mod flat_index;
pub mod registry;
pub mod retriever;
pub mod segmenter;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use answer::{answer_question, Answer, AnswerOptions, SourceRef, NO_CONTEXT_ANSWER};
pub use registry::{DocumentEntry, IndexRegistry};
pub use retriever::{retrieve, RetrievalOptions};
pub use types::{BuildReport, DocumentReport, DocumentText, RetrievalResult, SkippedDocument};

use crate::embeddings::EmbeddingProvider;
use scholar_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Documents gathered from disk, plus the ones that could not be read.
#[derive(Debug, Default)]
pub struct CollectedDocuments {
    /// Extracted documents ready for indexing, in discovery order
    pub documents: Vec<DocumentText>,

    /// Files whose extraction failed, with diagnostics
    pub unreadable: Vec<SkippedDocument>,
}

/// Gather documents from files, directories, and archives.
///
/// Explicit file paths are always attempted. Directory walks only pick
/// up recognized article extensions and skip dotfiles. Archives expand
/// into one document per usable member. Extraction failures land in
/// `unreadable` rather than aborting the gather; only a path that does
/// not exist at all is an error.
pub fn collect_documents(paths: &[PathBuf]) -> AppResult<CollectedDocuments> {
    let mut collected = CollectedDocuments::default();

    for path in paths {
        if path.is_file() {
            collect_file(path, &mut collected);
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && should_walk_into(entry_path) {
                    collect_file(entry_path, &mut collected);
                }
            }
        } else {
            return Err(AppError::Corpus(format!(
                "Path does not exist: {}",
                path.display()
            )));
        }
    }

    tracing::info!(
        "Collected {} documents ({} unreadable)",
        collected.documents.len(),
        collected.unreadable.len()
    );

    Ok(collected)
}

/// Build a complete registry straight from filesystem paths.
///
/// This is the wholesale rebuild: gather, extract, segment, embed, and
/// index in one pass. Unreadable files join the build report's skip
/// list so one summary covers the entire corpus.
pub async fn index_paths(
    paths: &[PathBuf],
    embedder: &dyn EmbeddingProvider,
    chunk_size: usize,
) -> AppResult<IndexRegistry> {
    let collected = collect_documents(paths)?;
    let mut registry = IndexRegistry::build(&collected.documents, embedder, chunk_size).await?;
    registry.note_unreadable(collected.unreadable);
    Ok(registry)
}

/// Extract one file (or archive) into the collection.
fn collect_file(path: &Path, collected: &mut CollectedDocuments) {
    if archive::is_archive(path) {
        match archive::expand_zip(path) {
            Ok(members) => {
                for member in members {
                    if !extract::is_supported(Path::new(&member.name)) {
                        tracing::debug!("Skipping unsupported archive member '{}'", member.name);
                        continue;
                    }
                    match extract::extract_bytes(&member.name, &member.payload) {
                        Ok(text) => collected.documents.push(DocumentText::new(member.name, text)),
                        Err(e) => {
                            tracing::warn!("Failed to extract '{}': {}", member.name, e);
                            collected.unreadable.push(SkippedDocument {
                                name: member.name,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
            }
            Err(e) => {
                let name = display_name(path);
                tracing::warn!("Failed to expand '{}': {}", name, e);
                collected.unreadable.push(SkippedDocument {
                    name,
                    reason: e.to_string(),
                });
            }
        }
        return;
    }

    let name = display_name(path);
    match extract::extract_file(path) {
        Ok(text) => collected.documents.push(DocumentText::new(name, text)),
        Err(e) => {
            tracing::warn!("Failed to extract '{}': {}", name, e);
            collected.unreadable.push(SkippedDocument {
                name,
                reason: e.to_string(),
            });
        }
    }
}

/// Directory walks take recognized article types and archives only.
fn should_walk_into(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false);

    !hidden && (extract::is_supported(path) || archive::is_archive(path))
}

/// Document identity for a filesystem path: its file name.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
