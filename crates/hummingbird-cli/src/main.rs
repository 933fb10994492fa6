//! Hummingbird CLI - Command-line interface for Hummingbird
//!
//! Provides commands for:
//! - Listing institutional filers
//! - Searching securities
//! - Viewing and validating configuration
//!
//! Listings keep working without a network connection by falling back to
//! built-in data.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hummingbird_core::config::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod session;

use commands::{
    config::ConfigCommand,
    listing::{FilersCommand, SecuritiesCommand},
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "hummingbird",
    version,
    about = "Browse institutional filers and securities, online or offline"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List institutional filers
    Filers(FilersCommand),
    /// List securities
    Securities(SecuritiesCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// `RUST_LOG` wins, then `-v`, then the configured level
fn env_filter(verbose: u8, configured: &str) -> EnvFilter {
    let fallback = match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn init_tracing(cli: &Cli, config: &Config) {
    let filter = env_filter(cli.verbose, &config.logging.level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);
    init_tracing(&cli, &config);

    let format = OutputFormat::from_flag(cli.json);

    match &cli.command {
        Commands::Filers(cmd) => cmd.execute(&config, format).await,
        Commands::Securities(cmd) => cmd.execute(&config, format).await,
        Commands::Config(cmd) => cmd.execute(&config_path, format).await,
    }
}
