//! Configuration management for the scholar CLI.
//!
//! Configuration is merged from several sources, later sources winning:
//! - Built-in defaults
//! - YAML config file (`scholar.yaml` or `SCHOLAR_CONFIG`)
//! - `SCHOLAR_*` environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Smallest accepted chunk size, in words.
pub const MIN_CHUNK_SIZE: usize = 200;

/// Largest accepted chunk size, in words.
pub const MAX_CHUNK_SIZE: usize = 800;

/// Main application configuration.
///
/// Holds every knob that affects CLI behavior across commands: retrieval
/// parameters, embedding provider selection, and generative model selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Words per chunk when segmenting documents
    pub chunk_size: usize,

    /// Number of globally best chunks returned per query
    pub top_k: usize,

    /// Candidates requested from each document before the global merge.
    /// Defaults to `top_k` when unset.
    pub per_document_k: Option<usize>,

    /// Embedding provider configuration
    pub embedding: EmbeddingConfig,

    /// Generative model configuration
    pub llm: LlmConfig,

    /// API key for the generative model provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "lexical", "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Custom endpoint for remote providers
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "lexical".to_string(),
            model: "lexical-v1".to_string(),
            dimensions: 384,
            endpoint: None,
        }
    }
}

/// Generative model configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    /// Provider name: "gemini", "ollama"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Custom endpoint override
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            endpoint: None,
        }
    }
}

/// On-disk configuration file structure. Every section and field is
/// optional; absent values keep whatever the previous layer set.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    retrieval: Option<RetrievalSection>,
    embedding: Option<EmbeddingSection>,
    llm: Option<LlmSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct RetrievalSection {
    chunk_size: Option<usize>,
    top_k: Option<usize>,
    per_document_k: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingSection {
    provider: Option<String>,
    model: Option<String>,
    dimensions: Option<usize>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            chunk_size: 500,
            top_k: 3,
            per_document_k: None,
            embedding: EmbeddingConfig::default(),
            llm: LlmConfig::default(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `SCHOLAR_CONFIG`: Path to config file (default: `./scholar.yaml`)
    /// - `SCHOLAR_CHUNK_SIZE`: Words per chunk
    /// - `SCHOLAR_TOP_K`: Result count per query
    /// - `SCHOLAR_PROVIDER`: Generative model provider
    /// - `SCHOLAR_MODEL`: Generative model identifier
    /// - `SCHOLAR_EMBEDDING_PROVIDER`: Embedding provider
    /// - `SCHOLAR_EMBEDDING_MODEL`: Embedding model identifier
    /// - `SCHOLAR_API_KEY` / `GEMINI_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration, preferring an explicitly given config file
    /// over `SCHOLAR_CONFIG` and the default path.
    ///
    /// An explicit file that does not exist is an error; the implicit
    /// default is simply skipped when absent.
    pub fn load_from(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let explicit = config_file.is_some();
        config.config_file = config_file;

        if config.config_file.is_none() {
            if let Ok(cf) = std::env::var("SCHOLAR_CONFIG") {
                config.config_file = Some(PathBuf::from(cf));
            }
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => PathBuf::from("scholar.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if explicit {
            return Err(AppError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        // Environment variables override YAML settings
        if let Ok(raw) = std::env::var("SCHOLAR_CHUNK_SIZE") {
            config.chunk_size = parse_env_usize("SCHOLAR_CHUNK_SIZE", &raw)?;
        }

        if let Ok(raw) = std::env::var("SCHOLAR_TOP_K") {
            config.top_k = parse_env_usize("SCHOLAR_TOP_K", &raw)?;
        }

        if let Ok(provider) = std::env::var("SCHOLAR_PROVIDER") {
            config.llm.provider = provider;
        }

        if let Ok(model) = std::env::var("SCHOLAR_MODEL") {
            config.llm.model = model;
        }

        if let Ok(provider) = std::env::var("SCHOLAR_EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }

        if let Ok(model) = std::env::var("SCHOLAR_EMBEDDING_MODEL") {
            config.embedding.model = model;
        }

        config.api_key = std::env::var("SCHOLAR_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(mut self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(retrieval) = file.retrieval {
            if let Some(chunk_size) = retrieval.chunk_size {
                self.chunk_size = chunk_size;
            }
            if let Some(top_k) = retrieval.top_k {
                self.top_k = top_k;
            }
            if retrieval.per_document_k.is_some() {
                self.per_document_k = retrieval.per_document_k;
            }
        }

        if let Some(embedding) = file.embedding {
            if let Some(provider) = embedding.provider {
                self.embedding.provider = provider;
            }
            if let Some(model) = embedding.model {
                self.embedding.model = model;
            }
            if let Some(dimensions) = embedding.dimensions {
                self.embedding.dimensions = dimensions;
            }
            if embedding.endpoint.is_some() {
                self.embedding.endpoint = embedding.endpoint;
            }
        }

        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if llm.endpoint.is_some() {
                self.llm.endpoint = llm.endpoint;
            }
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        Ok(self)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over both environment variables
    /// and the config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.llm.provider = provider;
        }

        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Candidates requested from each per-document index before the merge.
    pub fn local_k(&self) -> usize {
        self.per_document_k.unwrap_or(self.top_k)
    }

    /// Resolve the generative model API key.
    ///
    /// Checks the explicit `SCHOLAR_API_KEY` value first, then the
    /// provider's conventional environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.llm.provider.as_str() {
            "gemini" => std::env::var("GEMINI_API_KEY").ok(),
            _ => None,
        }
    }

    /// Validate configuration before running a command.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size < MIN_CHUNK_SIZE || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(AppError::Config(format!(
                "chunk_size must be between {} and {} words, got {}",
                MIN_CHUNK_SIZE, MAX_CHUNK_SIZE, self.chunk_size
            )));
        }

        if self.top_k == 0 {
            return Err(AppError::Config(
                "top_k must be at least 1".to_string(),
            ));
        }

        if self.per_document_k == Some(0) {
            return Err(AppError::Config(
                "per_document_k must be at least 1 when set".to_string(),
            ));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "embedding.dimensions must be at least 1".to_string(),
            ));
        }

        let known_embedding = ["lexical", "ollama"];
        if !known_embedding.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                known_embedding.join(", ")
            )));
        }

        let known_llm = ["gemini", "ollama"];
        if !known_llm.contains(&self.llm.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown LLM provider: {}. Supported: {}",
                self.llm.provider,
                known_llm.join(", ")
            )));
        }

        Ok(())
    }
}

fn parse_env_usize(name: &str, raw: &str) -> AppResult<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| AppError::Config(format!("{} must be a positive integer, got '{}'", name, raw)))
}
