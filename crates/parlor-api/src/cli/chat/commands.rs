//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for the session.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Re-send the last message after a failure.
    Retry,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    match trimmed.to_lowercase().as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/retry" | "/r" => Some(ChatCommand::Retry),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}   {}", style("/help").cyan(), "Show this help message");
    println!("  {}  {}", style("/clear").cyan(), "Clear the screen");
    println!("  {}   {}", style("/exit").cyan(), "End the chat session");
    println!(
        "  {}  {}",
        style("/retry").cyan(),
        "Re-send the last message after an error"
    );
    println!();
    println!(
        "  {}",
        style("Ctrl+C cancels a streaming reply, Ctrl+D exits").dim()
    );
    println!();
}
