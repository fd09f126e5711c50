//! Google Gemini provider implementation.
//!
//! Talks to the Generative Language API's `generateContent` endpoint:
//! https://ai.google.dev/api/generate-content

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use scholar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Gemini API request body.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "topP", skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini API response body.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

/// Gemini LLM client.
pub struct GeminiClient {
    /// Base URL for the Generative Language API
    base_url: String,

    /// API key, sent as a query parameter
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client with the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a new Gemini client with a custom base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert LlmRequest to the Gemini wire format.
    fn to_gemini_request(&self, request: &LlmRequest) -> GeminiRequest {
        let generation_config = if request.temperature.is_some()
            || request.top_p.is_some()
            || request.max_tokens.is_some()
        {
            Some(GeminiGenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system.as_ref().map(|system| GeminiContent {
                parts: vec![GeminiPart {
                    text: system.clone(),
                }],
            }),
            generation_config,
        }
    }
}

/// Pull the answer text and usage out of a Gemini response.
///
/// The answer is the concatenation of the first candidate's parts. A
/// response without candidates (safety block, quota) is an error rather
/// than an empty answer.
fn extract_answer(response: GeminiResponse, model: &str) -> AppResult<LlmResponse> {
    let usage = response
        .usage_metadata
        .map(|u| LlmUsage::new(u.prompt_token_count, u.candidates_token_count))
        .unwrap_or_default();

    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .ok_or_else(|| AppError::Llm("Gemini returned no candidates".to_string()))?;

    Ok(LlmResponse {
        content,
        model: model.to_string(),
        usage,
    })
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Gemini");

        let gemini_request = self.to_gemini_request(request);
        // The key travels in the query string, so the URL must stay out of
        // logs and error messages.
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, request.model, self.api_key
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Gemini response: {}", e)))?;

        let elapsed = start.elapsed().as_secs_f64();
        tracing::info!("Gemini API call took {:.2} seconds", elapsed);

        extract_answer(gemini_response, &request.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new("test-key");
        assert_eq!(client.provider_name(), "gemini");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_gemini_request_conversion() {
        let client = GeminiClient::new("test-key");
        let request = LlmRequest::new("Summarize the article", "gemini-2.0-flash")
            .with_temperature(0.3)
            .with_max_tokens(1000);

        let wire = client.to_gemini_request(&request);
        let value = serde_json::to_value(&wire).unwrap();

        assert_eq!(
            value["contents"][0]["parts"][0]["text"],
            "Summarize the article"
        );
        assert_eq!(value["generationConfig"]["temperature"], 0.3);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 1000);
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn test_gemini_request_bare_prompt_has_no_generation_config() {
        let client = GeminiClient::new("test-key");
        let request = LlmRequest::new("hello", "gemini-2.0-flash");

        let wire = client.to_gemini_request(&request);
        let value = serde_json::to_value(&wire).unwrap();
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn test_extract_answer_concatenates_parts() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "The cat "},
                        {"text": "sat on the mat."}
                    ]
                }
            }],
            "usageMetadata": {
                "promptTokenCount": 42,
                "candidatesTokenCount": 7
            }
        });

        let response: GeminiResponse = serde_json::from_value(raw).unwrap();
        let answer = extract_answer(response, "gemini-2.0-flash").unwrap();
        assert_eq!(answer.content, "The cat sat on the mat.");
        assert_eq!(answer.usage.prompt_tokens, 42);
        assert_eq!(answer.usage.completion_tokens, 7);
        assert_eq!(answer.usage.total_tokens, 49);
    }

    #[test]
    fn test_extract_answer_rejects_empty_candidates() {
        let raw = serde_json::json!({ "candidates": [] });
        let response: GeminiResponse = serde_json::from_value(raw).unwrap();

        let result = extract_answer(response, "gemini-2.0-flash");
        assert!(result.is_err());
    }
}
