//! SSE streaming chat endpoint.
//!
//! POST /api/v1/chat/stream
//!
//! Accepts the full message history as JSON and relays the provider's
//! streamed completion as Server-Sent Events. Transient provider
//! failures are retried transparently (bounded, and only before any
//! text has been relayed).
//!
//! SSE event types:
//! - `text_delta` — incremental text: `{ "text": "..." }`
//! - `error` — error occurred mid-stream: `{ "message": "..." }`
//! - `done` — stream complete: `{}`
//!
//! Failures that happen before the stream opens do not get an SSE
//! response at all: the first provider event is awaited up front, so an
//! immediate failure surfaces as a JSON `{"error": ...}` status response
//! instead.

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::{Stream, StreamExt};

use parlor_core::llm::retry::stream_with_retry;
use parlor_types::llm::{ChatRequest, StreamEvent};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/v1/chat/stream — SSE streaming chat relay.
pub async fn stream_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    if body.messages.is_empty() {
        return Err(AppError::Validation(
            "messages must not be empty".to_string(),
        ));
    }

    let mut llm_stream = stream_with_retry(state.provider.clone(), body.messages, state.retry);

    // Hold back the first substantive event. A failure at this point has
    // not produced any output yet, so it can still be reported as a
    // plain JSON error response.
    let pending = loop {
        match llm_stream.next().await {
            Some(Ok(StreamEvent::Connected)) => continue,
            Some(Ok(event)) => break Some(event),
            Some(Err(e)) => return Err(AppError::from(e)),
            None => break None,
        }
    };

    let sse_stream = async_stream::stream! {
        let mut llm_stream = llm_stream;
        let mut pending = pending;

        loop {
            let event = match pending.take() {
                Some(event) => Some(Ok(event)),
                None => llm_stream.next().await,
            };

            match event {
                Some(Ok(StreamEvent::TextDelta { text })) => {
                    let data = serde_json::json!({ "text": text });
                    yield Ok::<_, Infallible>(
                        Event::default().event("text_delta").data(data.to_string()),
                    );
                }
                Some(Ok(StreamEvent::Connected)) => {}
                Some(Ok(StreamEvent::Done)) | None => {
                    yield Ok(Event::default().event("done").data("{}"));
                    break;
                }
                Some(Err(e)) => {
                    let data = serde_json::json!({ "message": e.to_string() });
                    yield Ok(Event::default().event("error").data(data.to_string()));
                    break;
                }
            }
        }
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
