//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline`. The readline future is safe to
//! poll inside `tokio::select!`, which is how the chat loop stays
//! responsive to Ctrl+C while a reply is streaming: raw mode means the
//! key arrives as an input event rather than a SIGINT, so cancellation
//! has to be observed here, not via signal handlers.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// User submitted a line (trimmed).
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt (Ctrl+C).
    Interrupted,
}

impl From<ReadlineEvent> for InputEvent {
    fn from(event: ReadlineEvent) -> Self {
        match event {
            ReadlineEvent::Line(line) => InputEvent::Message(line.trim().to_string()),
            ReadlineEvent::Eof => InputEvent::Eof,
            ReadlineEvent::Interrupted => InputEvent::Interrupted,
        }
    }
}

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create a new chat input handler with the given prompt.
    ///
    /// Puts the terminal in raw mode for the lifetime of the handler.
    /// Returns the handler and a `SharedWriter` for printing without
    /// clobbering the prompt line.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    /// Read the next input event.
    ///
    /// Cancel-safe: the chat loop selects on this against the streaming
    /// response so a Ctrl+C pressed mid-stream surfaces immediately as
    /// [`InputEvent::Interrupted`]. A read error is treated as EOF.
    pub async fn read_line(&mut self) -> InputEvent {
        self.rl
            .readline()
            .await
            .map(InputEvent::from)
            .unwrap_or(InputEvent::Eof)
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }
}
