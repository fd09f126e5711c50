//! Per-document index registry.
//!
//! Builds one searchable index per document and owns the aligned chunk
//! sequences. A registry is an immutable snapshot: reprocessing the
//! corpus builds a fresh registry and the caller swaps it in whole, so
//! readers never observe a half-built state.

use crate::embeddings::EmbeddingProvider;
use crate::flat_index::FlatIndex;
use crate::segmenter::{normalize_whitespace, segment};
use crate::types::{BuildReport, DocumentReport, DocumentText, SkippedDocument};
use crate::vector_index::VectorSearch;
use chrono::Utc;
use scholar_core::{AppError, AppResult};
use std::time::Instant;

/// One indexed document: identity, ordered chunks, and the index over
/// their vectors. Index position `i` always refers to `chunks[i]`.
pub struct DocumentEntry {
    /// Document identity
    pub name: String,

    /// Chunk texts in document order
    pub chunks: Vec<String>,

    /// Nearest-neighbor index over the chunk vectors
    pub index: Box<dyn VectorSearch>,
}

/// Immutable snapshot of every per-document index built in one pass.
///
/// Entries keep the order documents were first seen in; a document
/// reappearing under the same name replaces its earlier entry without
/// moving it. That order is also the tiebreak order at query time.
pub struct IndexRegistry {
    entries: Vec<DocumentEntry>,
    report: BuildReport,
}

impl IndexRegistry {
    /// Build a registry from extracted documents.
    ///
    /// Every document is normalized, segmented, embedded in one batch
    /// call, and indexed. A document that cleans to nothing or fails
    /// embedding is skipped with a diagnostic while the rest of the
    /// build continues; only provider construction problems and other
    /// caller errors abort the whole pass.
    pub async fn build(
        documents: &[DocumentText],
        embedder: &dyn EmbeddingProvider,
        chunk_size: usize,
    ) -> AppResult<IndexRegistry> {
        let started = Instant::now();
        tracing::info!(
            "Building registry for {} documents (chunk size {} words, provider '{}')",
            documents.len(),
            chunk_size,
            embedder.provider_name()
        );

        let mut entries: Vec<DocumentEntry> = Vec::new();
        let mut indexed: Vec<DocumentReport> = Vec::new();
        let mut skipped: Vec<SkippedDocument> = Vec::new();
        let mut dimension: Option<usize> = None;

        for document in documents {
            let entry = match index_document(document, embedder, chunk_size).await {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", document.name, e);
                    skipped.push(SkippedDocument {
                        name: document.name.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            // All entries must live in one vector space; the dimension
            // is fixed by the first indexed document
            let entry_dimension = entry.index.dimension();
            match dimension {
                None => dimension = Some(entry_dimension),
                Some(expected) if entry_dimension != expected => {
                    tracing::warn!(
                        "Skipping '{}': embedding dimension {} does not match registry dimension {}",
                        document.name,
                        entry_dimension,
                        expected
                    );
                    skipped.push(SkippedDocument {
                        name: document.name.clone(),
                        reason: format!(
                            "embedding dimension {} does not match registry dimension {}",
                            entry_dimension, expected
                        ),
                    });
                    continue;
                }
                Some(_) => {}
            }

            let chunk_count = entry.chunks.len();
            let report_entry = DocumentReport {
                name: entry.name.clone(),
                chunks: chunk_count,
            };

            // Same name again replaces the earlier entry in place,
            // keeping its original position
            match entries.iter().position(|e| e.name == entry.name) {
                Some(i) => {
                    tracing::warn!(
                        "'{}' appears more than once; the later copy replaces the earlier one",
                        entry.name
                    );
                    entries[i] = entry;
                    if let Some(r) = indexed.iter_mut().find(|r| r.name == report_entry.name) {
                        *r = report_entry;
                    }
                }
                None => {
                    entries.push(entry);
                    indexed.push(report_entry);
                }
            }
        }

        let duration_secs = started.elapsed().as_secs_f64();
        let report = BuildReport {
            indexed,
            skipped,
            dimension,
            provider: embedder.provider_name().to_string(),
            model: embedder.model_name().to_string(),
            built_at: Utc::now(),
            duration_secs,
        };

        tracing::info!(
            "Registry build completed: {} documents indexed, {} skipped, {} chunks in {:.2}s",
            report.indexed.len(),
            report.skipped.len(),
            report.total_chunks(),
            duration_secs
        );

        Ok(IndexRegistry { entries, report })
    }

    /// Record documents that never reached the builder (unreadable
    /// sources). They appear at the front of the skip list so the
    /// report reads in discovery order.
    pub fn note_unreadable(&mut self, skips: Vec<SkippedDocument>) {
        if skips.is_empty() {
            return;
        }
        let mut merged = skips;
        merged.append(&mut self.report.skipped);
        self.report.skipped = merged;
    }

    /// Indexed entries in registry order.
    pub fn entries(&self) -> &[DocumentEntry] {
        &self.entries
    }

    /// Look up an entry by document identity.
    pub fn get(&self, name: &str) -> Option<&DocumentEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no document produced an index.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension shared by every index, `None` when empty.
    pub fn dimension(&self) -> Option<usize> {
        self.report.dimension
    }

    /// Build report for this snapshot.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }
}

/// Index a single document, from raw text to searchable entry.
async fn index_document(
    document: &DocumentText,
    embedder: &dyn EmbeddingProvider,
    chunk_size: usize,
) -> AppResult<DocumentEntry> {
    let cleaned = normalize_whitespace(&document.text);
    if cleaned.is_empty() {
        return Err(AppError::Corpus("no text after cleaning".to_string()));
    }

    let chunks = segment(&cleaned, chunk_size);
    tracing::info!(
        "'{}': {} chunks of up to {} words",
        document.name,
        chunks.len(),
        chunk_size
    );

    // One batched call per document
    let vectors = embedder.embed_batch(&chunks).await?;
    if vectors.len() != chunks.len() {
        return Err(AppError::Embedding(format!(
            "embedder returned {} vectors for {} chunks",
            vectors.len(),
            chunks.len()
        )));
    }
    tracing::debug!(
        "'{}': embedding shape ({}, {})",
        document.name,
        vectors.len(),
        vectors.first().map(|v| v.len()).unwrap_or(0)
    );

    let index = FlatIndex::build(vectors)?;

    Ok(DocumentEntry {
        name: document.name.clone(),
        chunks,
        index: Box::new(index),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::LexicalProvider;

    /// Build a text of `n` distinct words.
    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    /// Embedding provider that fails on texts containing "poison".
    #[derive(Debug)]
    struct FailingProvider {
        inner: LexicalProvider,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for FailingProvider {
        fn provider_name(&self) -> &str {
            "failing"
        }

        fn model_name(&self) -> &str {
            "failing-v1"
        }

        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            if texts.iter().any(|t| t.contains("poison")) {
                return Err(AppError::Embedding("simulated embedding outage".to_string()));
            }
            self.inner.embed_batch(texts).await
        }
    }

    #[tokio::test]
    async fn test_build_indexes_every_document() {
        let provider = LexicalProvider::new(64);
        let documents = vec![
            DocumentText::new("a.txt", words(600)),
            DocumentText::new("b.txt", "quantum entanglement explained"),
        ];

        let registry = IndexRegistry::build(&documents, &provider, 500).await.unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.dimension(), Some(64));
        assert_eq!(registry.report().indexed.len(), 2);
        assert!(registry.report().skipped.is_empty());
    }

    #[tokio::test]
    async fn test_chunks_align_with_index() {
        let provider = LexicalProvider::new(64);
        let documents = vec![DocumentText::new("a.txt", words(600))];

        let registry = IndexRegistry::build(&documents, &provider, 500).await.unwrap();

        let entry = registry.get("a.txt").unwrap();
        assert_eq!(entry.chunks.len(), 2);
        assert_eq!(entry.index.len(), 2);
        assert_eq!(registry.report().total_chunks(), 2);
    }

    #[tokio::test]
    async fn test_empty_document_is_skipped() {
        let provider = LexicalProvider::new(64);
        let documents = vec![
            DocumentText::new("empty.txt", "   \n\t  "),
            DocumentText::new("full.txt", "actual article content here"),
        ];

        let registry = IndexRegistry::build(&documents, &provider, 500).await.unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.report().skipped.len(), 1);
        assert_eq!(registry.report().skipped[0].name, "empty.txt");
        assert!(registry.report().skipped[0].reason.contains("no text"));
    }

    #[tokio::test]
    async fn test_embedding_failure_isolates_document() {
        let provider = FailingProvider {
            inner: LexicalProvider::new(64),
        };
        let documents = vec![
            DocumentText::new("good1.txt", "first valid article"),
            DocumentText::new("bad.txt", "this one contains poison words"),
            DocumentText::new("good2.txt", "second valid article"),
        ];

        let registry = IndexRegistry::build(&documents, &provider, 500).await.unwrap();

        assert_eq!(registry.len(), 2, "valid documents should still be indexed");
        assert!(registry.get("good1.txt").is_some());
        assert!(registry.get("good2.txt").is_some());
        assert_eq!(registry.report().skipped.len(), 1);
        assert_eq!(registry.report().skipped[0].name, "bad.txt");
        assert!(registry.report().skipped[0].reason.contains("outage"));
    }

    #[tokio::test]
    async fn test_duplicate_name_replaces_in_place() {
        let provider = LexicalProvider::new(64);
        let documents = vec![
            DocumentText::new("dup.txt", "original version of the text"),
            DocumentText::new("other.txt", "an unrelated article"),
            DocumentText::new("dup.txt", words(600)),
        ];

        let registry = IndexRegistry::build(&documents, &provider, 500).await.unwrap();

        assert_eq!(registry.len(), 2);

        // Position preserved: dup.txt still first, other.txt second
        let names: Vec<&str> = registry.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["dup.txt", "other.txt"]);

        // Content comes from the later copy
        let entry = registry.get("dup.txt").unwrap();
        assert_eq!(entry.chunks.len(), 2);

        // Report mirrors the replacement
        assert_eq!(registry.report().indexed.len(), 2);
        assert_eq!(registry.report().indexed[0].chunks, 2);
    }

    #[tokio::test]
    async fn test_no_documents_builds_empty_registry() {
        let provider = LexicalProvider::new(64);

        let registry = IndexRegistry::build(&[], &provider, 500).await.unwrap();

        assert!(registry.is_empty());
        assert_eq!(registry.dimension(), None);
    }

    #[tokio::test]
    async fn test_note_unreadable_prepends_skips() {
        let provider = LexicalProvider::new(64);
        let documents = vec![DocumentText::new("empty.txt", "")];

        let mut registry = IndexRegistry::build(&documents, &provider, 500).await.unwrap();
        registry.note_unreadable(vec![SkippedDocument {
            name: "broken.pdf".to_string(),
            reason: "pdftotext failed".to_string(),
        }]);

        let skipped = &registry.report().skipped;
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].name, "broken.pdf");
        assert_eq!(skipped[1].name, "empty.txt");
    }
}
