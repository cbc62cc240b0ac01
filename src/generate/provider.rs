//! Text-generation provider integration.
//!
//! The [`BlogProvider`] trait is the seam between the generation client and
//! the network. [`OpenAIProvider`] talks to the OpenAI Responses API (or any
//! compatible gateway) with a blocking HTTP client; callers are expected to
//! run it off the async executor.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::GenerateError;

/// Timeout for establishing a connection (30 seconds).
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ==================== Trait ====================

/// A blocking text-generation backend.
pub trait BlogProvider: Send + Sync {
    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Sends `prompt` to the provider and returns the raw generated text.
    fn complete(&self, prompt: &str) -> Result<String, GenerateError>;
}

// ==================== OpenAI ====================

/// OpenAI Responses API provider.
pub struct OpenAIProvider {
    /// HTTP client instance.
    client: Client,
    /// OpenAI API key.
    api_key: String,
    /// Model identifier (e.g., "gpt-4o-mini").
    model: String,
    /// API base, without a trailing slash.
    base_url: String,
}

impl OpenAIProvider {
    /// Creates a provider with its own HTTP client.
    ///
    /// Must be called outside of an async context.
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        request_timeout: Duration,
    ) -> Result<Self, GenerateError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| GenerateError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }

    /// Builds the JSON request body for the Responses API.
    fn build_request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "model": self.model,
            "input": prompt,
        })
    }
}

impl BlogProvider for OpenAIProvider {
    fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = self.build_request_body(prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| GenerateError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerateError::HttpError {
                status: status_code,
                body: body_text,
            });
        }

        let json: Value = response
            .json()
            .map_err(|e| GenerateError::ParseError(e.to_string()))?;

        extract_output_text(&json)
    }
}

// ==================== Response parsing ====================

/// Extracts generated text from a Responses API payload.
///
/// Prefers the aggregated `output_text` field and otherwise takes the first
/// non-empty `output[*].content[*].text`. A payload without usable text is
/// an [`GenerateError::EmptyResponse`].
pub(crate) fn extract_output_text(json: &Value) -> Result<String, GenerateError> {
    if let Some(text) = json
        .get("output_text")
        .and_then(|t| t.as_str())
        .filter(|t| !t.trim().is_empty())
    {
        return Ok(text.to_string());
    }

    json.get("output")
        .and_then(|o| o.as_array())
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(|c| c.as_array()))
        .flatten()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or(GenerateError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_provider() -> OpenAIProvider {
        OpenAIProvider::new(
            "test-key".to_string(),
            "gpt-4o-mini".to_string(),
            "https://api.openai.com/v1".to_string(),
            Duration::from_secs(5),
        )
        .expect("Failed to build provider")
    }

    #[test]
    fn test_request_body() {
        let provider = build_provider();
        let body = provider.build_request_body("Write about Rust.");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["input"], "Write about Rust.");
    }

    #[test]
    fn test_endpoint_uses_base_url() {
        let provider = build_provider();
        assert_eq!(provider.endpoint(), "https://api.openai.com/v1/responses");
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_extract_output_text_field() {
        let json = serde_json::json!({ "output_text": "An article." });
        assert_eq!(extract_output_text(&json).unwrap(), "An article.");
    }

    #[test]
    fn test_extract_output_falls_back_to_content_parts() {
        let json = serde_json::json!({
            "output": [
                { "type": "reasoning", "summary": [] },
                {
                    "type": "message",
                    "role": "assistant",
                    "content": [
                        { "type": "output_text", "text": "Generated body." }
                    ]
                }
            ]
        });
        assert_eq!(extract_output_text(&json).unwrap(), "Generated body.");
    }

    #[test]
    fn test_extract_output_blank_output_text_uses_parts() {
        let json = serde_json::json!({
            "output_text": "   ",
            "output": [{ "content": [{ "text": "Fallback." }] }]
        });
        assert_eq!(extract_output_text(&json).unwrap(), "Fallback.");
    }

    #[test]
    fn test_extract_output_empty_is_error() {
        for json in [
            serde_json::json!({}),
            serde_json::json!({ "output": [] }),
            serde_json::json!({ "output": [{ "content": [{ "text": "" }] }] }),
        ] {
            match extract_output_text(&json) {
                Err(GenerateError::EmptyResponse) => {}
                other => panic!("Expected EmptyResponse, got: {other:?}"),
            }
        }
    }
}
