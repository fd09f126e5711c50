//! Embedding generation for chunk and query vectors.
//!
//! One provider serves the whole session so documents and queries share
//! a vector space. The lexical provider works offline; Ollama adds
//! neural embeddings when a server is available.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{LexicalProvider, OllamaProvider};
