//! telroute - attribute-based routing for logs, metrics and traces
//!
//! # Usage
//!
//! ```bash
//! # Validate config and resolve routes for every record kind
//! telroute check --config telroute.toml
//!
//! # Route one batch, tenant taken from call metadata
//! telroute route --config telroute.toml --signal logs --input batch.json \
//!     --metadata X-Tenant=acme
//!
//! # Show where each sink's data would go without writing anything
//! telroute route --signal traces --input spans.json --dry-run
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use telroute::cmd;
use telroute::logging::init_logging;

/// telroute - attribute-based routing for logs, metrics and traces
#[derive(Parser, Debug)]
#[command(name = "telroute")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, default_value = "telroute.toml", global = true)]
    config: PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate configuration and resolve routes
    Check(cmd::check::CheckArgs),

    /// Route one batch through the configured table
    Route(cmd::route::RouteArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = telroute::load_config(&cli.config)?;
    init_logging(&config.log, cli.log_level.as_deref())?;

    match cli.command {
        Command::Check(args) => cmd::check::run(&config, args),
        Command::Route(args) => cmd::route::run(&config, args).await,
    }
}
