// Utility functions for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;

/// Print a value as pretty JSON on stdout
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}
