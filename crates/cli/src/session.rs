//! Shared corpus session for retrieval commands.
//!
//! Owns the embedding provider and the registry snapshot that the search,
//! ask, and chat commands query. Reloading builds a fresh registry and
//! swaps it in; the previous snapshot is never mutated.

use scholar_core::config::{AppConfig, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use scholar_core::{AppError, AppResult};
use scholar_corpus::embeddings::{create_provider, EmbeddingProvider};
use scholar_corpus::{index_paths, BuildReport, IndexRegistry, RetrievalOptions};
use std::path::PathBuf;
use std::sync::Arc;

/// An indexed corpus plus the provider that embeds queries against it.
pub struct CorpusSession {
    paths: Vec<PathBuf>,
    chunk_size: usize,
    provider: Arc<dyn EmbeddingProvider>,
    registry: Arc<IndexRegistry>,
}

impl CorpusSession {
    /// Index `paths` and hold the resulting snapshot for querying.
    pub async fn open(
        paths: Vec<PathBuf>,
        config: &AppConfig,
        chunk_size_flag: Option<usize>,
    ) -> AppResult<Self> {
        if paths.is_empty() {
            return Err(AppError::Config("No corpus paths given".to_string()));
        }

        let chunk_size = resolve_chunk_size(config, chunk_size_flag)?;
        let provider = create_provider(&config.embedding).await?;
        let registry = index_paths(&paths, provider.as_ref(), chunk_size).await?;

        Ok(Self {
            paths,
            chunk_size,
            provider,
            registry: Arc::new(registry),
        })
    }

    /// Rebuild the registry from the session's paths and swap in the new
    /// snapshot. Returns the fresh build report.
    pub async fn reload(&mut self) -> AppResult<&BuildReport> {
        let registry = index_paths(&self.paths, self.provider.as_ref(), self.chunk_size).await?;
        self.registry = Arc::new(registry);
        Ok(self.registry.report())
    }

    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    pub fn provider(&self) -> &dyn EmbeddingProvider {
        self.provider.as_ref()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

/// Chunk size for a build: the command flag wins over config, and an
/// out-of-range flag is rejected just like an out-of-range config value.
pub fn resolve_chunk_size(config: &AppConfig, flag: Option<usize>) -> AppResult<usize> {
    match flag {
        Some(size) if size < MIN_CHUNK_SIZE || size > MAX_CHUNK_SIZE => {
            Err(AppError::Config(format!(
                "chunk_size must be between {} and {} words, got {}",
                MIN_CHUNK_SIZE, MAX_CHUNK_SIZE, size
            )))
        }
        Some(size) => Ok(size),
        None => Ok(config.chunk_size),
    }
}

/// Retrieval options for a command: flags win over config, and the
/// per-document candidate count stays unset unless someone asked for it.
pub fn resolve_retrieval(
    config: &AppConfig,
    top_k: Option<usize>,
    local_k: Option<usize>,
) -> RetrievalOptions {
    let options = RetrievalOptions::new(top_k.unwrap_or(config.top_k));
    match local_k.or(config.per_document_k) {
        Some(local_k) => options.with_local_k(local_k),
        None => options,
    }
}
