//! LLM provider factory.
//!
//! Creates generative model clients from application configuration,
//! resolving endpoints and injecting API keys where a provider needs one.

use crate::client::LlmClient;
use crate::providers::{GeminiClient, OllamaClient};
use scholar_core::config::LlmConfig;
use scholar_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client for the configured provider.
///
/// # Arguments
/// * `config` - Provider name, model, and optional endpoint override
/// * `api_key` - API key for providers that require one
///
/// # Errors
/// Returns a config error when the provider is unknown or a required API
/// key is missing.
pub fn create_client(config: &LlmConfig, api_key: Option<String>) -> AppResult<Arc<dyn LlmClient>> {
    match config.provider.to_lowercase().as_str() {
        "gemini" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config(
                    "Gemini provider requires an API key (set GEMINI_API_KEY)".to_string(),
                )
            })?;
            let client = match config.endpoint {
                Some(ref endpoint) => GeminiClient::with_base_url(api_key, endpoint),
                None => GeminiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        "ollama" => {
            let endpoint = config.endpoint.as_deref().unwrap_or("http://localhost:11434");
            Ok(Arc::new(OllamaClient::with_base_url(endpoint)))
        }
        other => Err(AppError::Config(format!(
            "Unknown LLM provider: {}. Supported: gemini, ollama",
            other
        ))),
    }
}
