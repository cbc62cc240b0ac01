//! Blog article generation via an external text-generation provider.
//!
//! [`GenerationClient`] wraps a single provider call: it builds the
//! tone-aware prompt, runs the blocking provider on tokio's blocking pool
//! so request handlers stay responsive, bounds the call with a timeout,
//! and normalizes the returned text.
//!
//! # Usage
//!
//! Build the client once at startup with [`GenerationClient::from_config`].
//! A missing API key yields [`GenerateError::NotConfigured`], which callers
//! keep around as the "generation unavailable" state instead of retrying.

pub mod prompt;
pub mod provider;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::storage::models::Tone;
use crate::text::normalize_whitespace;

pub use provider::{BlogProvider, OpenAIProvider};

/// Generated article text plus the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub content: String,
    pub model: String,
}

/// Client for generating blog articles.
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn BlogProvider>,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn BlogProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Builds an OpenAI-backed client from configuration.
    ///
    /// Returns `NotConfigured` when no API key is set. Must be called
    /// outside of an async context, because the blocking HTTP client owns
    /// its own runtime.
    pub fn from_config(config: &Config) -> Result<Self, GenerateError> {
        let api_key = config.api_key().ok_or(GenerateError::NotConfigured)?;
        let timeout = config.request_timeout();
        let provider = OpenAIProvider::new(
            api_key.to_string(),
            config.model().to_string(),
            config.base_url().to_string(),
            timeout,
        )?;
        Ok(Self::new(Arc::new(provider), timeout))
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Generates an article for `title`.
    ///
    /// Makes exactly one provider call on the blocking pool. Empty output,
    /// a panicked worker and an elapsed timeout are all errors; this never
    /// returns empty content.
    pub async fn generate(
        &self,
        title: &str,
        tone: Option<Tone>,
    ) -> Result<Generated, GenerateError> {
        let prompt = prompt::build_prompt(title, tone);
        let provider = Arc::clone(&self.provider);
        let task = tokio::task::spawn_blocking(move || provider.complete(&prompt));

        tracing::debug!(title, model = self.model(), "Requesting blog generation");

        let raw = match tokio::time::timeout(self.timeout, task).await {
            Err(_) => return Err(GenerateError::Timeout(self.timeout)),
            Ok(Err(join_err)) => return Err(GenerateError::WorkerFailed(join_err.to_string())),
            Ok(Ok(result)) => result?,
        };

        let content = normalize_whitespace(&raw);
        if content.is_empty() {
            return Err(GenerateError::EmptyResponse);
        }

        Ok(Generated {
            content,
            model: self.model().to_string(),
        })
    }
}

/// Errors that can occur during blog generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// No API key is configured.
    #[error("OPENAI_API_KEY is missing. Set it in your environment before running the app.")]
    NotConfigured,

    /// Network or connection error when calling the provider API.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The provider API returned a non-success HTTP status code.
    #[error("HTTP error ({status}): {body}")]
    HttpError {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Failed to parse the provider API response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The provider returned no usable text.
    #[error("OpenAI returned an empty response.")]
    EmptyResponse,

    /// The provider did not answer in time.
    #[error("Generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The worker running the provider call failed.
    #[error("Generation worker failed: {0}")]
    WorkerFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider that records prompts and answers with a fixed result.
    struct StubProvider {
        reply: Result<String, String>,
        delay: Duration,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl BlogProvider for StubProvider {
        fn model(&self) -> &str {
            "stub-model"
        }

        fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            std::thread::sleep(self.delay);
            self.reply.clone().map_err(GenerateError::RequestFailed)
        }
    }

    #[test]
    fn test_from_config_without_key_is_not_configured() {
        let config = Config::default();
        match GenerationClient::from_config(&config) {
            Err(GenerateError::NotConfigured) => {}
            Err(other) => panic!("Expected NotConfigured, got: {other:?}"),
            Ok(_) => panic!("Expected NotConfigured, got a client"),
        }
    }

    #[test]
    fn test_from_config_with_key_uses_model() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            openai_model: Some("gpt-4.1-mini".to_string()),
            ..Config::default()
        };
        let client = GenerationClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "gpt-4.1-mini");
    }

    #[tokio::test]
    async fn test_generate_normalizes_content() {
        let stub = Arc::new(StubProvider::replying("\r\n# Title\r\n\r\n\r\n\r\nBody text.  \n"));
        let client = GenerationClient::new(stub.clone(), Duration::from_secs(5));

        let generated = client.generate("Title", Some(Tone::Formal)).await.unwrap();

        assert_eq!(generated.content, "# Title\n\nBody text.");
        assert_eq!(generated.model, "stub-model");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("Write in a formal tone."));
        assert!(prompts[0].contains("Topic: Title"));
    }

    #[tokio::test]
    async fn test_generate_whitespace_only_is_empty_response() {
        let client =
            GenerationClient::new(Arc::new(StubProvider::replying(" \n\n ")), Duration::from_secs(5));
        match client.generate("Title", None).await {
            Err(GenerateError::EmptyResponse) => {}
            other => panic!("Expected EmptyResponse, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_propagates_provider_error() {
        let stub = StubProvider {
            reply: Err("connection refused".to_string()),
            ..StubProvider::replying("")
        };
        let client = GenerationClient::new(Arc::new(stub), Duration::from_secs(5));
        let err = client.generate("Title", None).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_generate_times_out() {
        let stub = StubProvider {
            delay: Duration::from_millis(500),
            ..StubProvider::replying("late")
        };
        let client = GenerationClient::new(Arc::new(stub), Duration::from_millis(20));
        match client.generate("Title", None).await {
            Err(GenerateError::Timeout(d)) => assert_eq!(d, Duration::from_millis(20)),
            other => panic!("Expected Timeout, got: {other:?}"),
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_generate_does_not_block_executor() {
        let stub = StubProvider {
            delay: Duration::from_millis(200),
            ..StubProvider::replying("slow body")
        };
        let client = GenerationClient::new(Arc::new(stub), Duration::from_secs(5));
        let done = AtomicBool::new(false);

        let generation = async {
            let result = client.generate("Slow", None).await;
            done.store(true, Ordering::SeqCst);
            result
        };
        let ticker = async {
            let mut ticks = 0;
            while !done.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(10)).await;
                ticks += 1;
            }
            ticks
        };

        let (result, ticks) = tokio::join!(generation, ticker);

        assert!(result.is_ok());
        // A provider call on the executor thread would starve the ticker.
        assert!(ticks >= 5, "ticker only advanced {ticks} times");
    }

    #[test]
    fn test_error_display() {
        assert!(GenerateError::NotConfigured
            .to_string()
            .contains("OPENAI_API_KEY"));
        assert_eq!(
            GenerateError::Timeout(Duration::from_secs(120)).to_string(),
            "Generation timed out after 120s"
        );
        let err = GenerateError::HttpError {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
    }
}
