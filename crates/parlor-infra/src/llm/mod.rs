//! Provider clients.

pub mod gemini;
