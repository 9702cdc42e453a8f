// Deployment configuration commands

use anyhow::{Context, Result};
use clap::Args;
use perpcity_sdk::SdkConfig;
use tracing::info;

use super::utils::print_json;

#[derive(Args)]
pub struct ConfigCmd {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "perpcity.toml")]
    path: String,
}

pub fn execute(cmd: ConfigCmd) -> Result<()> {
    let config = SdkConfig::load(&cmd.path).with_context(|| format!("Invalid configuration in {}", cmd.path))?;
    info!("Loaded configuration for chain {}", config.chain_id);
    print_json(&config)
}
