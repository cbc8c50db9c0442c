//! Request handlers.

pub mod chat;
