//! Main chat loop orchestration.
//!
//! Reads lines with an async readline, dispatches slash commands, and spawns
//! one task per message so the user can keep typing while replies are
//! pending. Output goes through the readline writer so it never tears the
//! prompt.

use std::sync::Arc;

use console::style;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use medidesk_core::chat::ChatOutcome;

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Run the interactive chat loop until Ctrl+D or `/exit`.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    print_welcome_banner(state.transport.base_url().as_str());

    let chat = Arc::new(state.chat_flow());
    let triage = state.triage_flow(None);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    state.surface.set_echo_user(false);
    state.surface.attach_writer(writer);

    let mut in_flight: JoinSet<ChatOutcome> = JoinSet::new();
    info!("Chat session started");

    loop {
        while let Some(done) = in_flight.try_join_next() {
            log_outcome(done);
        }

        match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Blank => continue,
            InputEvent::Interrupted => {
                let hint = style("Press Ctrl+D to exit, or keep chatting.").dim();
                state.surface.say(&format!("\n  {hint}"));
            }
            InputEvent::Command(cmd) => match cmd {
                ChatCommand::Help => {
                    for line in commands::help_lines() {
                        state.surface.say(&line);
                    }
                }
                ChatCommand::Clear => {
                    chat_input.clear();
                    state.surface.clear_transcript();
                }
                ChatCommand::Exit => break,
                ChatCommand::Triage(symptoms) => {
                    triage.start_triage(&symptoms).await;
                }
                ChatCommand::Doctors => {
                    triage.list_all_specialists().await;
                }
                ChatCommand::Unknown(cmd_name) => {
                    state.surface.say(&format!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(cmd_name).dim()
                    ));
                }
            },
            InputEvent::Ask(text) => {
                let chat = Arc::clone(&chat);
                in_flight.spawn(async move { chat.send_message(&text).await });
            }
        }
    }

    if !in_flight.is_empty() {
        let waiting = match in_flight.len() {
            1 => "Waiting for 1 pending reply...".to_string(),
            n => format!("Waiting for {n} pending replies..."),
        };
        state.surface.say(&format!("\n  {}", style(waiting).dim()));
    }
    while let Some(done) = in_flight.join_next().await {
        log_outcome(done);
    }

    state.surface.detach_writer();
    chat_input.flush();
    println!("\n  {}", style("Session ended.").dim());
    info!("Chat session ended");
    Ok(())
}

fn log_outcome(done: Result<ChatOutcome, tokio::task::JoinError>) {
    match done {
        Ok(outcome) => debug!(token = ?outcome.token(), ?outcome, "Chat submission finished"),
        Err(e) => warn!(error = %e, "Chat submission task failed"),
    }
}
