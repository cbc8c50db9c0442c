//! Conversation message and request status types for Parlor.
//!
//! A conversation is an ordered, append-only sequence of [`ChatMessage`]s
//! held in memory for the lifetime of a session. [`RequestStatus`] is the
//! four-state lifecycle of a single submission.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// One turn in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Convenience constructor for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Convenience constructor for an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Lifecycle status of the in-flight exchange.
///
/// Transitions:
/// - `idle -> submitted` on a valid non-empty submission
/// - `submitted -> streaming` when the first byte arrives
/// - `streaming -> idle` on completion or stop
/// - any -> `error` on network/provider failure
/// - `error -> submitted` on retry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Submitted,
    Streaming,
    Error,
}

impl RequestStatus {
    /// Whether a request is currently in flight.
    ///
    /// The submit control is disabled while this is true, which is what
    /// prevents overlapping requests.
    pub fn is_busy(&self) -> bool {
        matches!(self, RequestStatus::Submitted | RequestStatus::Streaming)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Idle => write!(f, "idle"),
            RequestStatus::Submitted => write!(f, "submitted"),
            RequestStatus::Streaming => write!(f, "streaming"),
            RequestStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(RequestStatus::Idle),
            "submitted" => Ok(RequestStatus::Submitted),
            "streaming" => Ok(RequestStatus::Streaming),
            "error" => Ok(RequestStatus::Error),
            other => Err(format!("invalid request status: '{other}'")),
        }
    }
}
