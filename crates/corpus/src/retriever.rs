//! Cross-document retrieval.
//!
//! Embeds the query once, fans a local search out across every
//! per-document index, and merges the candidates into one ranking by
//! ascending distance. The merge sort is stable, so equal distances
//! fall back to registry order and then to local rank.

use crate::embeddings::EmbeddingProvider;
use crate::registry::IndexRegistry;
use crate::types::RetrievalResult;
use scholar_core::{AppError, AppResult};
use std::cmp::Ordering;

/// Knobs for one retrieval pass.
#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    /// Size of the final merged ranking
    pub top_k: usize,

    /// Candidates requested from each document before the merge.
    /// `None` uses `top_k`. One document can hold more than `top_k` of
    /// the true global best; raising this recovers them at the cost of
    /// a larger merge pool.
    pub local_k: Option<usize>,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            local_k: None,
        }
    }
}

impl RetrievalOptions {
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            local_k: None,
        }
    }

    pub fn with_local_k(mut self, local_k: usize) -> Self {
        self.local_k = Some(local_k);
        self
    }

    fn effective_local_k(&self) -> usize {
        self.local_k.unwrap_or(self.top_k)
    }
}

/// Retrieve the closest chunks to `query` across the whole registry.
///
/// Returns up to `top_k` results ascending by distance; fewer when the
/// corpus holds fewer chunks, empty for an empty registry or zero
/// `top_k`. Any per-index failure fails the query as a whole.
pub async fn retrieve(
    query: &str,
    embedder: &dyn EmbeddingProvider,
    registry: &IndexRegistry,
    options: &RetrievalOptions,
) -> AppResult<Vec<RetrievalResult>> {
    if options.top_k == 0 || registry.is_empty() {
        return Ok(Vec::new());
    }

    // One query embedding serves every per-document search
    let query_vector = embedder.embed(query).await?;
    let local_k = options.effective_local_k();

    let mut pool: Vec<RetrievalResult> = Vec::new();
    for entry in registry.entries() {
        let neighbors = entry.index.search(&query_vector, local_k)?;
        for neighbor in neighbors {
            let text = entry.chunks.get(neighbor.position).ok_or_else(|| {
                AppError::Corpus(format!(
                    "index for '{}' returned position {} beyond {} chunks",
                    entry.name,
                    neighbor.position,
                    entry.chunks.len()
                ))
            })?;

            pool.push(RetrievalResult {
                document: entry.name.clone(),
                position: neighbor.position,
                text: text.clone(),
                distance: neighbor.distance,
            });
        }
    }

    pool.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
    let candidates = pool.len();
    pool.truncate(options.top_k);

    tracing::debug!(
        "Query matched {} candidates across {} documents; returning {}",
        candidates,
        registry.len(),
        pool.len()
    );

    Ok(pool)
}
