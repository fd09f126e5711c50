//! Corpus type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document accepted for indexing: a stable identity plus its raw
/// extracted text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentText {
    /// Document identity (typically the file name)
    pub name: String,

    /// Raw text as extracted, before whitespace normalization
    pub text: String,
}

impl DocumentText {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// A candidate chunk returned by retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Identity of the document the chunk came from
    pub document: String,

    /// Chunk position within its document (0-based)
    pub position: usize,

    /// Chunk text
    pub text: String,

    /// Squared Euclidean distance to the query vector (lower is closer)
    pub distance: f32,
}

/// Per-document entry in a build report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Document identity
    pub name: String,

    /// Number of chunks indexed for this document
    pub chunks: usize,
}

/// A document that contributed no index, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDocument {
    /// Document identity
    pub name: String,

    /// Human-readable reason for the skip
    pub reason: String,
}

/// Summary of one registry build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Documents indexed, in registry order
    pub indexed: Vec<DocumentReport>,

    /// Documents skipped, with diagnostics
    pub skipped: Vec<SkippedDocument>,

    /// Embedding dimension shared by every index, `None` when nothing indexed
    pub dimension: Option<usize>,

    /// Embedding provider used for the build
    pub provider: String,

    /// Embedding model used for the build
    pub model: String,

    /// When the build finished
    pub built_at: DateTime<Utc>,

    /// Build duration in seconds
    pub duration_secs: f64,
}

impl BuildReport {
    /// Total chunks across every indexed document.
    pub fn total_chunks(&self) -> usize {
        self.indexed.iter().map(|d| d.chunks).sum()
    }
}
