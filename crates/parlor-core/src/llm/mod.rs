//! Provider abstraction and streaming helpers.

pub mod provider;
pub mod retry;

pub use provider::ChatProvider;
pub use retry::{RetryPolicy, stream_with_retry};
