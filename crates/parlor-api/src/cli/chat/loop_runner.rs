//! Main chat loop orchestration.
//!
//! Drives the interactive conversation: input loop, slash commands,
//! submission through [`ChatSession`], and streaming render of the
//! relayed reply. Ctrl+C during a streaming reply cancels it (the
//! partial text stays in the transcript); Ctrl+D exits.

use std::io::Write;
use std::time::Duration;

use console::style;
use futures_util::StreamExt;

use parlor_core::session::{ChatSession, SessionEvent};
use parlor_infra::api_client::ChatApiClient;
use parlor_types::chat::ChatMessage;
use parlor_types::llm::StreamEvent;

use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Run the interactive chat loop against a server at `url`.
pub async fn run_chat_loop(url: &str) -> anyhow::Result<()> {
    let client = ChatApiClient::new(url);
    let mut session = ChatSession::new();

    // Log status transitions as the session publishes them.
    let mut status_rx = session.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = status_rx.recv().await {
            if let SessionEvent::StatusChanged(status) = event {
                tracing::debug!(?status, "session status changed");
            }
        }
    });

    println!();
    println!(
        "  {} Parlor chat -- connected to {}",
        style("❖").bold(),
        style(url).cyan()
    );
    println!("  {}", style("Type /help for commands").dim());
    println!();

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Press Ctrl+D to exit, or keep chatting.").dim()
                );
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Clear => chat_input.clear(),
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        ChatCommand::Retry => match session.retry() {
                            Some(messages) => {
                                stream_exchange(&mut session, &mut chat_input, &client, messages)
                                    .await;
                            }
                            None => {
                                println!(
                                    "\n  {} Nothing to retry.\n",
                                    style("?").yellow().bold()
                                );
                            }
                        },
                        ChatCommand::Unknown(name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(name).dim()
                            );
                        }
                    }
                    continue;
                }

                session.set_input(text);
                if let Some(messages) = session.submit() {
                    stream_exchange(&mut session, &mut chat_input, &client, messages).await;
                }
            }
        }
    }

    Ok(())
}

/// Stream one exchange, rendering tokens as they arrive.
///
/// Selects the streaming response against the readline so Ctrl+C
/// surfaces mid-stream (raw mode delivers it as an input event, not a
/// SIGINT). Cancelling drops the stream, which aborts the request; the
/// partial reply stays in the transcript as final.
async fn stream_exchange(
    session: &mut ChatSession,
    input: &mut ChatInput,
    client: &ChatApiClient,
    messages: Vec<ChatMessage>,
) {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let mut stream = client.stream(messages);
    let mut first_token = false;

    loop {
        tokio::select! {
            event = input.read_line() => {
                match event {
                    InputEvent::Interrupted | InputEvent::Eof => {
                        spinner.finish_and_clear();
                        session.stop();
                        println!("\n  {}", style("Stopped.").dim());
                        println!();
                        return;
                    }
                    InputEvent::Message(_) => {
                        // Typed lines are dropped while a reply streams;
                        // submission is disabled until it finishes.
                    }
                }
            }
            event = stream.next() => {
                match event {
                    Some(Ok(StreamEvent::Connected)) => {}
                    Some(Ok(StreamEvent::TextDelta { text })) => {
                        if !first_token {
                            spinner.finish_and_clear();
                            first_token = true;
                            print!("\n  {} ", style("Model >").cyan().bold());
                            let _ = std::io::stdout().flush();
                        }
                        session.apply_chunk(&text);
                        print!("{text}");
                        let _ = std::io::stdout().flush();
                    }
                    Some(Ok(StreamEvent::Done)) | None => {
                        spinner.finish_and_clear();
                        session.complete();
                        if first_token {
                            println!();
                        }
                        println!();
                        return;
                    }
                    Some(Err(e)) => {
                        spinner.finish_and_clear();
                        session.fail(e.to_string());
                        let message = session
                            .last_error()
                            .unwrap_or("Unknown error")
                            .to_string();
                        eprintln!("\n  {} {}", style("!").red().bold(), message);
                        eprintln!("  {}", style("Type /retry to try again.").dim());
                        println!();
                        return;
                    }
                }
            }
        }
    }
}
