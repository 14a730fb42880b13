//! CLI command definitions for the `medidesk` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod config;
pub mod doctors;
pub mod terminal;
pub mod triage;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Talk to the clinic assistant and book a specialist.
#[derive(Parser)]
#[command(name = "medidesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Plain output: no spinners, banners, or colors beyond the content.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed logging (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Clinic server URL, overriding `base_url` from config.toml.
    #[arg(long, global = true, env = "MEDIDESK_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat with the clinic assistant.
    Chat,

    /// Ask the assistant one question and print the reply.
    Ask {
        /// The question. Multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Match symptoms to specialists, pick a slot, and confirm it.
    Triage {
        /// Symptoms to match. Prompted for when omitted.
        symptoms: Option<String>,

        /// Day to check slot availability for (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List every specialist the clinic has.
    #[command(alias = "specialists")]
    Doctors,

    /// Print the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
