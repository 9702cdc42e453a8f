// CLI tool for PerpCity
//
// Offline quoting on the command line: price / tick / sqrt-price
// conversions, liquidity sizing, position risk and trade planning against an
// in-memory market. Every command prints JSON.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "perpcity")]
#[command(about = "PerpCity pricing and risk CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price, tick and sqrt-price conversions
    Price(commands::price::PriceCmd),

    /// Liquidity sizing for a tick range
    Liquidity(commands::liquidity::LiquidityCmd),

    /// Position risk and leverage conversions
    Risk(commands::risk::RiskCmd),

    /// Plan trades against an in-memory market
    Plan(commands::plan::PlanCmd),

    /// Validate a deployment configuration file
    Config(commands::config::ConfigCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the flag
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Price(cmd) => commands::price::execute(cmd),
        Commands::Liquidity(cmd) => commands::liquidity::execute(cmd),
        Commands::Risk(cmd) => commands::risk::execute(cmd),
        Commands::Plan(cmd) => commands::plan::execute(cmd).await,
        Commands::Config(cmd) => commands::config::execute(cmd),
    }
}
