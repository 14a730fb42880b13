//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(server: &str) {
    println!();
    println!("  🩺 {}", style("MediDesk clinic assistant").cyan().bold());
    println!(
        "  {}",
        style("Ask about symptoms, conditions, or clinic services.").dim()
    );
    println!();
    println!("  {}  {}", style("Server:").bold(), style(server).dim());
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
