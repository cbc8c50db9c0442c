//! HTTP client for the Parlor proxy endpoint.
//!
//! The terminal chat view talks to the server the same way the browser
//! does: POST the message history to `/api/v1/chat/stream` and consume
//! the relayed SSE events (`text_delta`, `error`, `done`).

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use serde::Deserialize;

use parlor_core::llm::provider::EventStream;
use parlor_types::chat::ChatMessage;
use parlor_types::llm::{ChatRequest, LlmError, StreamEvent};

/// Payload of a relayed `text_delta` event.
#[derive(Debug, Deserialize)]
struct TextDeltaPayload {
    text: String,
}

/// Payload of a relayed `error` event.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
}

/// Body of a non-2xx proxy response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the chat relay endpoint.
#[derive(Clone)]
pub struct ChatApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ChatApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/api/v1/chat/stream", self.base_url)
    }

    /// Send the message history and stream back the relayed events.
    ///
    /// Non-2xx responses carry a JSON `{"error": ...}` body; that
    /// message surfaces as the single item of the returned stream.
    pub fn stream(&self, messages: Vec<ChatMessage>) -> EventStream {
        let client = self.client.clone();
        let url = self.url();
        let body = ChatRequest { messages };

        Box::pin(async_stream::try_stream! {
            let response = client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| LlmError::Provider {
                    message: format!("request to {url} failed: {e}"),
                })?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorBody>(&text)
                    .map(|b| b.error)
                    .unwrap_or(text);
                Err(LlmError::Provider {
                    message: format!("HTTP {status}: {message}"),
                })?;
            } else {
                yield StreamEvent::Connected;

                let mut events = response.bytes_stream().eventsource();
                while let Some(event) = events.next().await {
                    let event = event.map_err(|e| LlmError::Stream(e.to_string()))?;
                    if let Some(mapped) = parse_event(&event.event, &event.data)? {
                        let done = matches!(mapped, StreamEvent::Done);
                        yield mapped;
                        if done {
                            break;
                        }
                    }
                }
            }
        })
    }
}

/// Map one relayed SSE event to a [`StreamEvent`].
///
/// Unknown event names are skipped so the vocabulary can grow without
/// breaking older clients.
fn parse_event(name: &str, data: &str) -> Result<Option<StreamEvent>, LlmError> {
    match name {
        "text_delta" => {
            let payload: TextDeltaPayload = serde_json::from_str(data)
                .map_err(|e| LlmError::Deserialization(format!("text_delta: {e}")))?;
            Ok(Some(StreamEvent::TextDelta { text: payload.text }))
        }
        "error" => {
            let message = serde_json::from_str::<ErrorPayload>(data)
                .map(|p| p.message)
                .unwrap_or_else(|_| data.to_string());
            Err(LlmError::Provider { message })
        }
        "done" => Ok(Some(StreamEvent::Done)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_delta() {
        let event = parse_event("text_delta", r#"{"text":"Hi"}"#).unwrap();
        assert_eq!(event, Some(StreamEvent::TextDelta { text: "Hi".into() }));
    }

    #[test]
    fn test_parse_done() {
        let event = parse_event("done", "{}").unwrap();
        assert_eq!(event, Some(StreamEvent::Done));
    }

    #[test]
    fn test_parse_error_surfaces_message() {
        let err = parse_event("error", r#"{"message":"quota exceeded"}"#).unwrap_err();
        assert!(matches!(
            err,
            LlmError::Provider { message } if message == "quota exceeded"
        ));
    }

    #[test]
    fn test_parse_error_with_unstructured_data() {
        let err = parse_event("error", "something broke").unwrap_err();
        assert!(matches!(
            err,
            LlmError::Provider { message } if message == "something broke"
        ));
    }

    #[test]
    fn test_unknown_event_is_skipped() {
        assert_eq!(parse_event("ping", "{}").unwrap(), None);
    }

    #[test]
    fn test_malformed_text_delta_is_an_error() {
        assert!(parse_event("text_delta", "not json").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ChatApiClient::new("http://localhost:3000/");
        assert_eq!(client.url(), "http://localhost:3000/api/v1/chat/stream");
    }
}
