//! MediDesk CLI entry point.
//!
//! Binary name: `medidesk`
//!
//! Parses CLI arguments, sets up tracing, wires the HTTP transport and the
//! terminal surface, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use medidesk_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};

use cli::terminal::OutputMode;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Neither needs a transport, and `config` must work with a broken base_url.
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(*shell, &mut cmd, "medidesk", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Config => {
            return cli::config::show_config(cli.server.as_deref(), cli.json).await;
        }
        _ => {}
    }

    let mode = OutputMode::from_flags(cli.json, cli.quiet);
    let state = AppState::init(cli.server.as_deref(), mode).await?;

    match cli.command {
        Commands::Chat => {
            if cli.json {
                anyhow::bail!("`chat` is interactive; use `medidesk ask --json` instead");
            }
            cli::chat::loop_runner::run_chat_loop(&state).await?;
        }

        Commands::Ask { query } => {
            cli::ask::ask(&state, &query.join(" "), cli.json).await?;
        }

        Commands::Triage { symptoms, date } => {
            cli::triage::run_triage(&state, symptoms, date, cli.json).await?;
        }

        Commands::Doctors => {
            cli::doctors::list_doctors(&state, cli.json).await?;
        }

        Commands::Config | Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
