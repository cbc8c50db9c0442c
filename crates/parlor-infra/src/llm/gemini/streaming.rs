//! Gemini SSE stream to [`StreamEvent`] adapter.
//!
//! `streamGenerateContent?alt=sse` emits one SSE `data:` line per
//! generation chunk; each payload is a JSON `GenerateContentChunk`. The
//! stream ends when the HTTP body ends, with no explicit terminator, so
//! `Done` is synthesized after the last chunk.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use parlor_core::llm::provider::EventStream;
use parlor_types::llm::{LlmError, StreamEvent};

use super::types::{ErrorResponse, GenerateContentChunk, GenerateContentRequest};

/// Open the streaming request and adapt it to [`StreamEvent`]s.
///
/// The returned stream emits:
/// 1. `Connected` -- once the provider accepted the request
/// 2. `TextDelta` -- for each chunk carrying candidate text
/// 3. `Done` -- when the provider closes the stream
///
/// Request-level failures (connect errors, non-2xx statuses) surface as
/// the first and only item.
pub fn create_gemini_stream(
    client: &reqwest::Client,
    url: String,
    body: GenerateContentRequest,
    api_key: &SecretString,
) -> EventStream {
    let client = client.clone();
    let api_key = api_key.clone();

    Box::pin(async_stream::try_stream! {
        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            Err(status_to_error(status, error_body))?;
        } else {
            yield StreamEvent::Connected;

            let mut events = response.bytes_stream().eventsource();
            while let Some(event) = events.next().await {
                let event = event.map_err(|e| LlmError::Stream(e.to_string()))?;
                let chunk: GenerateContentChunk =
                    serde_json::from_str(&event.data).map_err(|e| {
                        LlmError::Deserialization(format!("failed to parse chunk: {e}"))
                    })?;
                if let Some(text) = chunk.text() {
                    yield StreamEvent::TextDelta { text };
                }
            }

            yield StreamEvent::Done;
        }
    })
}

/// Map a non-2xx response to an [`LlmError`].
///
/// The body is the Gemini error envelope when the service produced it;
/// the raw text is used when it does not parse.
fn status_to_error(status: StatusCode, body: String) -> LlmError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    match status.as_u16() {
        400 => LlmError::InvalidRequest(message),
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        503 | 529 => LlmError::Overloaded(message),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}
