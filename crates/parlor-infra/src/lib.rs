//! Infrastructure layer for Parlor.
//!
//! Concrete implementations of the abstractions in `parlor-core`: the
//! Gemini streaming client, the proxy API client used by the terminal
//! chat view, and the configuration loader.

pub mod api_client;
pub mod config;
pub mod llm;
