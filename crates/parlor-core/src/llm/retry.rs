//! Bounded retry wrapper for provider streams.
//!
//! Re-issues the provider request on transient failure, at most
//! `max_retries` times, and only while nothing has been relayed to the
//! caller yet. Once a token has gone out there is no clean way to restart
//! the generation, so a mid-stream error is surfaced instead.

use std::sync::Arc;

use futures_util::StreamExt;

use parlor_types::chat::ChatMessage;
use parlor_types::llm::{LlmError, StreamEvent};

use super::provider::{ChatProvider, EventStream};

/// Retry policy for a single streaming exchange.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum automatic re-issues after the initial attempt.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 2 }
    }
}

/// Whether an error is worth an automatic retry.
///
/// Rate limits, overload and connection-level failures are transient.
/// Authentication, request validation and decoding failures are not --
/// re-sending the identical request cannot succeed.
pub fn is_transient(error: &LlmError) -> bool {
    matches!(
        error,
        LlmError::RateLimited { .. }
            | LlmError::Overloaded(_)
            | LlmError::Provider { .. }
            | LlmError::Stream(_)
    )
}

/// Stream a completion with bounded automatic retries.
///
/// Each attempt calls `provider.stream` with the identical message
/// history. A transient error before the first `TextDelta` triggers a
/// re-issue (up to `policy.max_retries` times); any other error, or any
/// error after text has been relayed, ends the stream with that error.
/// `Connected` is emitted at most once across attempts.
pub fn stream_with_retry(
    provider: Arc<dyn ChatProvider>,
    messages: Vec<ChatMessage>,
    policy: RetryPolicy,
) -> EventStream {
    Box::pin(async_stream::stream! {
        let mut attempt: u32 = 0;
        let mut connected_sent = false;

        'attempts: loop {
            let mut inner = provider.stream(messages.clone());
            let mut relayed = false;
            let mut retrying = false;

            while let Some(event) = inner.next().await {
                match event {
                    Ok(StreamEvent::Connected) => {
                        if !connected_sent {
                            connected_sent = true;
                            yield Ok(StreamEvent::Connected);
                        }
                    }
                    Ok(StreamEvent::TextDelta { text }) => {
                        relayed = true;
                        yield Ok(StreamEvent::TextDelta { text });
                    }
                    Ok(StreamEvent::Done) => {
                        yield Ok(StreamEvent::Done);
                        break 'attempts;
                    }
                    Err(e) => {
                        if !relayed && attempt < policy.max_retries && is_transient(&e) {
                            tracing::warn!(
                                provider = provider.name(),
                                attempt = attempt + 1,
                                error = %e,
                                "transient provider failure, retrying"
                            );
                            retrying = true;
                            break;
                        }
                        yield Err(e);
                        break 'attempts;
                    }
                }
            }

            if !retrying {
                // Provider stream ended without an explicit Done.
                break 'attempts;
            }
            attempt += 1;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};

    use futures_util::stream;

    /// Provider that fails the first `failures` attempts, then streams
    /// "Hi" / " there" and completes.
    struct FlakyProvider {
        calls: AtomicU32,
        failures: u32,
        error: fn() -> LlmError,
    }

    impl FlakyProvider {
        fn new(failures: u32, error: fn() -> LlmError) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
                error,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ChatProvider for FlakyProvider {
        fn name(&self) -> &str {
            "flaky"
        }

        fn stream(&self, _messages: Vec<ChatMessage>) -> EventStream {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let events: Vec<Result<StreamEvent, LlmError>> = if n < self.failures {
                vec![Err((self.error)())]
            } else {
                vec![
                    Ok(StreamEvent::Connected),
                    Ok(StreamEvent::TextDelta {
                        text: "Hi".to_string(),
                    }),
                    Ok(StreamEvent::TextDelta {
                        text: " there".to_string(),
                    }),
                    Ok(StreamEvent::Done),
                ]
            };
            Box::pin(stream::iter(events))
        }
    }

    /// Provider that relays one token, then fails.
    struct MidStreamFailure {
        calls: AtomicU32,
    }

    impl ChatProvider for MidStreamFailure {
        fn name(&self) -> &str {
            "midstream"
        }

        fn stream(&self, _messages: Vec<ChatMessage>) -> EventStream {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(stream::iter(vec![
                Ok(StreamEvent::Connected),
                Ok(StreamEvent::TextDelta {
                    text: "partial".to_string(),
                }),
                Err(LlmError::Overloaded("gone away".to_string())),
            ]))
        }
    }

    fn overloaded() -> LlmError {
        LlmError::Overloaded("busy".to_string())
    }

    fn auth_failed() -> LlmError {
        LlmError::AuthenticationFailed
    }

    async fn collect(stream: EventStream) -> Vec<Result<StreamEvent, LlmError>> {
        stream.collect().await
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::user("Hello")]
    }

    #[test]
    fn test_default_policy_allows_two_retries() {
        assert_eq!(RetryPolicy::default().max_retries, 2);
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient(&LlmError::RateLimited {
            retry_after_ms: None
        }));
        assert!(is_transient(&LlmError::Overloaded("x".into())));
        assert!(is_transient(&LlmError::Stream("reset".into())));
        assert!(!is_transient(&LlmError::AuthenticationFailed));
        assert!(!is_transient(&LlmError::InvalidRequest("bad".into())));
        assert!(!is_transient(&LlmError::Deserialization("bad".into())));
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let provider = Arc::new(FlakyProvider::new(2, overloaded));
        let events = collect(stream_with_retry(
            provider.clone(),
            messages(),
            RetryPolicy::default(),
        ))
        .await;

        // Two failed attempts plus the successful third
        assert_eq!(provider.calls(), 3);
        let text: String = events
            .iter()
            .filter_map(|e| match e {
                Ok(StreamEvent::TextDelta { text }) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "Hi there");
        assert!(matches!(events.last(), Some(Ok(StreamEvent::Done))));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let provider = Arc::new(FlakyProvider::new(5, overloaded));
        let events = collect(stream_with_retry(
            provider.clone(),
            messages(),
            RetryPolicy::default(),
        ))
        .await;

        // Initial attempt + 2 retries, then the error surfaces
        assert_eq!(provider.calls(), 3);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(LlmError::Overloaded(_))));
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let provider = Arc::new(FlakyProvider::new(1, auth_failed));
        let events = collect(stream_with_retry(
            provider.clone(),
            messages(),
            RetryPolicy::default(),
        ))
        .await;

        assert_eq!(provider.calls(), 1);
        assert!(matches!(events[0], Err(LlmError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_no_retry_after_first_token() {
        let provider = Arc::new(MidStreamFailure {
            calls: AtomicU32::new(0),
        });
        let events = collect(stream_with_retry(
            provider.clone(),
            messages(),
            RetryPolicy::default(),
        ))
        .await;

        // The transient error surfaces because text was already relayed
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            events.last(),
            Some(Err(LlmError::Overloaded(_)))
        ));
        assert!(events.iter().any(|e| matches!(
            e,
            Ok(StreamEvent::TextDelta { text }) if text == "partial"
        )));
    }

    #[tokio::test]
    async fn test_zero_retries_policy() {
        let provider = Arc::new(FlakyProvider::new(1, overloaded));
        let events = collect(stream_with_retry(
            provider.clone(),
            messages(),
            RetryPolicy { max_retries: 0 },
        ))
        .await;

        assert_eq!(provider.calls(), 1);
        assert!(matches!(events[0], Err(LlmError::Overloaded(_))));
    }

    #[tokio::test]
    async fn test_connected_emitted_once_across_attempts() {
        let provider = Arc::new(FlakyProvider::new(1, overloaded));
        let events = collect(stream_with_retry(
            provider,
            messages(),
            RetryPolicy::default(),
        ))
        .await;

        let connected = events
            .iter()
            .filter(|e| matches!(e, Ok(StreamEvent::Connected)))
            .count();
        assert_eq!(connected, 1);
    }
}
