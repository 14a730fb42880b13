//! Slash command parsing for the chat loop.
//!
//! Commands start with `/`. Anything else is sent to the assistant.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen and the transcript.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Match symptoms to specialists without leaving the chat.
    Triage(String),
    /// List every specialist.
    Doctors,
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

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        // Empty symptoms are passed through: the triage flow owns that notice.
        "/triage" | "/t" => Some(ChatCommand::Triage(arg.to_string())),
        "/doctors" => Some(ChatCommand::Doctors),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Help text listing all available commands, one entry per line.
pub fn help_lines() -> Vec<String> {
    let entries = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen and transcript"),
        ("/exit", "End the chat session"),
        ("/triage <symptoms>", "Find specialists for your symptoms"),
        ("/doctors", "List all specialists"),
    ];

    let mut lines = vec![String::new(), format!("  {}", style("Available commands:").bold()), String::new()];
    for (cmd, about) in entries {
        lines.push(format!("  {}  {about}", style(format!("{cmd:<18}")).cyan()));
    }
    lines.push(String::new());
    lines.push(format!(
        "  {}",
        style("Book a slot with `medidesk triage`. Ctrl+D to exit.").dim()
    ));
    lines.push(String::new());
    lines
}
