//! Business logic for Parlor.
//!
//! This crate defines the chat session state machine and the provider
//! abstraction the infrastructure layer implements. It depends only on
//! `parlor-types` -- never on `parlor-infra` or any HTTP/IO crate.

pub mod llm;
pub mod session;
