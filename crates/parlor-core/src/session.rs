//! In-memory chat session state machine.
//!
//! [`ChatSession`] owns the transcript, the input text, the request
//! status, and the last error. It is the single mutation point for
//! session state: every mutation synchronously publishes a
//! [`SessionEvent`] on a `tokio::sync::broadcast` channel so a view can
//! re-render (and auto-scroll) whenever the transcript or status changes.
//!
//! Invariants:
//! - messages are appended in arrival order and never reordered;
//! - exactly one user message is appended per submission, before any
//!   network activity;
//! - no overlapping requests: submission is rejected while a request is
//!   in flight.

use tokio::sync::broadcast;

use parlor_types::chat::{ChatMessage, MessageRole, RequestStatus};

/// Fallback error text for failures that carry no message.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Notifications published on every session mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The message sequence changed (append or streaming delta).
    TranscriptChanged,
    /// The request status changed.
    StatusChanged(RequestStatus),
    /// The input text changed.
    InputChanged,
}

/// Client-side state for one chat session.
///
/// Destroyed when the owning view goes away; nothing is persisted.
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    input: String,
    status: RequestStatus,
    last_error: Option<String>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            messages: Vec::new(),
            input: String::new(),
            status: RequestStatus::Idle,
            last_error: None,
            events,
        }
    }

    /// Subscribe to session mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.status.is_busy() && !self.input.trim().is_empty()
    }

    /// Replace the input text.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.publish(SessionEvent::InputChanged);
    }

    /// Submit the current input.
    ///
    /// Appends exactly one user message, clears the input, and moves to
    /// `submitted`. Returns the full message history to send, or `None`
    /// when the input is empty/whitespace or a request is already in
    /// flight (the control is disabled in those states).
    pub fn submit(&mut self) -> Option<Vec<ChatMessage>> {
        if !self.can_submit() {
            return None;
        }

        let content = self.input.trim().to_string();
        self.input.clear();
        self.last_error = None;

        self.messages.push(ChatMessage::user(content));
        self.publish(SessionEvent::TranscriptChanged);
        self.set_status(RequestStatus::Submitted);

        Some(self.messages.clone())
    }

    /// Apply one streamed chunk to the transcript.
    ///
    /// The first chunk of an exchange creates the assistant message and
    /// moves `submitted -> streaming`; later chunks append to it in
    /// arrival order. Chunks arriving after stop/completion/failure are
    /// ignored.
    pub fn apply_chunk(&mut self, text: &str) {
        match self.status {
            RequestStatus::Submitted => {
                self.messages.push(ChatMessage::assistant(text));
                self.publish(SessionEvent::TranscriptChanged);
                self.set_status(RequestStatus::Streaming);
            }
            RequestStatus::Streaming => {
                match self.messages.last_mut() {
                    Some(last) if last.role == MessageRole::Assistant => {
                        last.content.push_str(text);
                    }
                    _ => self.messages.push(ChatMessage::assistant(text)),
                }
                self.publish(SessionEvent::TranscriptChanged);
            }
            RequestStatus::Idle | RequestStatus::Error => {}
        }
    }

    /// The stream finished normally; back to `idle`.
    ///
    /// Also handles a stream that ended without producing any output
    /// (still in `submitted`).
    pub fn complete(&mut self) {
        if self.status.is_busy() {
            self.set_status(RequestStatus::Idle);
        }
    }

    /// Cancel the in-flight exchange.
    ///
    /// The caller is responsible for aborting the underlying network
    /// stream (dropping it suffices); the partially streamed assistant
    /// message stays in place and becomes final.
    pub fn stop(&mut self) {
        self.complete();
    }

    /// Record a stream or network failure.
    ///
    /// The transcript is left intact; `last_error` is set for display.
    /// An empty message falls back to "Unknown error".
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        tracing::debug!(error = %message, "exchange failed");
        self.last_error = Some(message);
        self.set_status(RequestStatus::Error);
    }

    /// Re-issue the last submission after a failure.
    ///
    /// Drops a trailing partially-streamed assistant message (the retry
    /// regenerates it), moves `error -> submitted`, and returns the
    /// identical message history of the failed request. Returns `None`
    /// unless the session is in `error` with something to retry.
    pub fn retry(&mut self) -> Option<Vec<ChatMessage>> {
        if self.status != RequestStatus::Error || self.messages.is_empty() {
            return None;
        }

        if self
            .messages
            .last()
            .is_some_and(|m| m.role == MessageRole::Assistant)
        {
            self.messages.pop();
            self.publish(SessionEvent::TranscriptChanged);
        }

        self.last_error = None;
        self.set_status(RequestStatus::Submitted);
        Some(self.messages.clone())
    }

    fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
        self.publish(SessionEvent::StatusChanged(status));
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine; views are optional listeners.
        let _ = self.events.send(event);
    }
}
