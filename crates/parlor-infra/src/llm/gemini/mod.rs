//! Google Gemini provider.
//!
//! Implements [`parlor_core::llm::ChatProvider`] against the
//! `generativelanguage.googleapis.com` streaming API
//! (`streamGenerateContent?alt=sse`).

mod client;
mod streaming;
mod types;

pub use client::GeminiProvider;
