//! ChatProvider trait definition.
//!
//! The one abstraction over the hosted model: given an ordered message
//! history, produce a streaming sequence of text increments. The concrete
//! implementation lives in `parlor-infra` (e.g., `GeminiProvider`); the
//! proxy endpoint and the retry wrapper only see this trait.

use std::pin::Pin;

use futures_util::Stream;

use parlor_types::chat::ChatMessage;
use parlor_types::llm::{LlmError, StreamEvent};

/// Boxed event stream returned by [`ChatProvider::stream`].
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for hosted model backends.
///
/// `stream` returns a boxed stream so the trait stays object-safe; the
/// application state holds an `Arc<dyn ChatProvider>`.
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the message history and receive a stream of events.
    ///
    /// The stream yields `Connected` once the provider accepted the
    /// request, then zero or more `TextDelta`s in generation order, and
    /// finally `Done`. Request-level failures surface as the first item.
    fn stream(&self, messages: Vec<ChatMessage>) -> EventStream;
}
