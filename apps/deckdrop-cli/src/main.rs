//! deckdrop CLI
//!
//! Attach presentations to a deckdrop backend from the command line.

mod commands;
mod output;
mod presenter;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use colored::Colorize;
use deckdrop_core::{AppConfig, FileType};
use output::OutputFormat;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "deckdrop",
    author = "Deckdrop Team",
    version,
    about = "deckdrop - attach presentations for comparison",
    long_about = "A command-line front end for the deckdrop ingestion pipeline.\n\n\
                  Use this CLI to validate, parse and upload .pptx files into\n\
                  the original or modified slot of a deckdrop backend."
)]
pub(crate) struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "DECKDROP_CONFIG")]
    config: Option<String>,

    /// API base URL the save endpoint is resolved against
    #[arg(short, long, env = "DECKDROP_API_BASE")]
    api_base: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(
        short,
        long,
        default_value = "text",
        value_parser = ["text", "json", "yaml"]
    )]
    format: String,

    /// Log level filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How a file reaches the ingestion surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Via {
    /// File picker: no extension check
    Pick,
    /// Drag and drop: extension checked first
    Drop,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest one presentation into a slot
    Attach {
        /// Path to the presentation
        path: String,

        /// Slot to fill (original, modified)
        #[arg(short, long)]
        slot: Option<FileType>,

        /// Entry point to simulate
        #[arg(long, value_enum, default_value = "pick")]
        via: Via,
    },

    /// Drop files on the surface in a single gesture; only the first is used
    Drop {
        /// Paths of the dropped files
        #[arg(required = true)]
        paths: Vec<String>,

        /// Slot to fill (original, modified)
        #[arg(short, long)]
        slot: Option<FileType>,
    },

    /// Parse a presentation locally and print its slides
    Inspect {
        /// Path to the presentation
        path: String,
    },

    /// Check whether file names would be accepted on drop
    Check {
        /// File names to check
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Display version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate the script for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(api_base) = &cli.api_base {
        config.api.base_url = api_base.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json_logs {
        config.logging.json = true;
    }

    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    telemetry::init_telemetry(&config.logging)?;

    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Attach { path, slot, via } => {
            let slot = slot.unwrap_or(config.ingestion.file_type);
            commands::attach::run(&config, vec![path], slot, via, format).await
        }
        Commands::Drop { paths, slot } => {
            let slot = slot.unwrap_or(config.ingestion.file_type);
            commands::attach::run(&config, paths, slot, Via::Drop, format).await
        }
        Commands::Inspect { path } => commands::inspect::run(&path, format).await,
        Commands::Check { names } => commands::check::run(&names, format),
        Commands::Version => commands::version::run(format),
        Commands::Completions { shell } => {
            commands::completions::run(shell);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Setup colored output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let verbose = cli.verbose;

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            if verbose {
                for cause in e.chain().skip(1) {
                    eprintln!("{}: {}", "Caused by".yellow(), cause);
                }
            }
            ExitCode::FAILURE
        }
    }
}
