use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod logging;

/// Command-line client for the Kessel inventory API
#[derive(Parser)]
#[command(name = "kessel-inventory")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration and exit
    PrintConfig,
    /// Fetch an access token with the configured OIDC client credentials
    Token,
    /// Check whether a subject has a relation on a resource (v1beta2)
    Check(commands::CheckArgs),
    /// Report a resource from a JSON request file (v1beta2)
    Report(commands::ReportArgs),
    /// Delete a reporter's resource (v1beta2)
    Delete(commands::DeleteArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs)?;

    let config = config::load(cli.config.as_deref())?;
    tracing::debug!(url = %config.url, insecure = config.insecure, "configuration loaded");

    match cli.command {
        Commands::PrintConfig => commands::print_config(&config),
        Commands::Token => commands::token(&config).await,
        Commands::Check(args) => args.run(&config).await,
        Commands::Report(args) => args.run(&config).await,
        Commands::Delete(args) => args.run(&config).await,
    }
}
