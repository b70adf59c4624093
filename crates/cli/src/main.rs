//! talker CLI, the main entry point.
//!
//! Commands:
//! - `shell`: Interactive chat with the local model
//! - `fallback`: Answer a fallback for a recorded event log
//! - `context`: Show the conversation a fallback would see
//! - `config`: Show configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "talker",
    about = "talker: generative fallback responses for chat bots",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the model in the terminal
    Shell {
        /// Opening user utterance (defaults to `fallback.greeting`)
        #[arg(short, long)]
        greeting: Option<String>,
    },

    /// Generate the fallback response for a JSON event log
    Fallback {
        /// Path to the tracker event list (JSON array)
        #[arg(short, long)]
        events: PathBuf,
    },

    /// Print the history window and turns extracted from a JSON event log
    Context {
        /// Path to the tracker event list (JSON array)
        #[arg(short, long)]
        events: PathBuf,

        /// Print the assembled conversation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        default: bool,

        /// Print the config file path only
        #[arg(long, conflicts_with = "default")]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Shell { greeting } => commands::shell::run(greeting).await?,
        Commands::Fallback { events } => commands::fallback::run(&events).await?,
        Commands::Context { events, json } => commands::context::run(&events, json).await?,
        Commands::Config { default, path } => {
            if path {
                commands::config_cmd::path().await?
            } else if default {
                commands::config_cmd::defaults().await?
            } else {
                commands::config_cmd::show().await?
            }
        }
    }

    Ok(())
}
