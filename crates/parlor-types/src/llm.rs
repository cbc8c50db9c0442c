//! Provider request/streaming types for Parlor.
//!
//! These types model the boundary between the proxy endpoint and the
//! hosted model provider: the request wire shape, the provider-agnostic
//! streaming events, and the provider error taxonomy.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// Request body accepted by the proxy endpoint: `{ "messages": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Events emitted during a streaming provider response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Connection established with the provider.
    Connected,

    /// An incremental chunk of assistant text.
    TextDelta { text: String },

    /// The stream has completed.
    Done,
}

/// Errors from provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
