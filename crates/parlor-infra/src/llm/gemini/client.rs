//! GeminiProvider -- concrete [`ChatProvider`] implementation for
//! Google Gemini.
//!
//! Sends requests to `streamGenerateContent?alt=sse` with the
//! `x-goog-api-key` header. The API key is wrapped in
//! [`secrecy::SecretString`] and is never logged or included in `Debug`
//! output.

use std::time::Duration;

use secrecy::SecretString;

use parlor_core::llm::provider::{ChatProvider, EventStream};
use parlor_types::chat::{ChatMessage, MessageRole};

use super::streaming::create_gemini_stream;
use super::types::{Content, GenerateContentRequest, Part};

/// Google Gemini chat provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "gemini-1.5-pro-latest")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model,
        }
    }

    /// The model this provider targets.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full streaming endpoint URL.
    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }

    /// Convert a message history into a [`GenerateContentRequest`].
    ///
    /// Gemini names the assistant role "model".
    fn to_gemini_request(messages: &[ChatMessage]) -> GenerateContentRequest {
        let contents = messages
            .iter()
            .map(|m| Content {
                role: match m.role {
                    MessageRole::User => "user".to_string(),
                    MessageRole::Assistant => "model".to_string(),
                },
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GenerateContentRequest { contents }
    }
}

// GeminiProvider intentionally does NOT derive Debug so the API key can
// never end up in logs.

impl ChatProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn stream(&self, messages: Vec<ChatMessage>) -> EventStream {
        let body = Self::to_gemini_request(&messages);
        create_gemini_stream(&self.client, self.url(), body, &self.api_key)
    }
}
