//! Shared domain types for Parlor.
//!
//! This crate contains the types used across the Parlor chat client:
//! conversation messages, request status, streaming events, provider
//! errors, and configuration value objects.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod chat;
pub mod config;
pub mod llm;
