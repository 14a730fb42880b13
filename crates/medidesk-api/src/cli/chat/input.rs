//! Line input for the chat loop.
//!
//! Reads lines with `rustyline_async` and classifies each one: a question for
//! the assistant, a slash command, or nothing. Only questions and commands
//! enter the history.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

use super::commands::{self, ChatCommand};

/// What the user did at the prompt.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// A question for the assistant, already trimmed.
    Ask(String),
    /// A slash command.
    Command(ChatCommand),
    /// An empty or whitespace-only line.
    Blank,
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

/// Classify one submitted line.
pub fn classify(line: &str) -> InputEvent {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return InputEvent::Blank;
    }
    match commands::parse(trimmed) {
        Some(cmd) => InputEvent::Command(cmd),
        None => InputEvent::Ask(trimmed.to_string()),
    }
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Returns the input handler and the writer all chat output must go
    /// through while the prompt is shown.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let event = classify(&line);
                if !matches!(event, InputEvent::Blank) {
                    self.rl.add_history_entry(line.trim().to_string());
                }
                event
            }
            Ok(ReadlineEvent::Eof) | Err(_) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
        }
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before exit.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
