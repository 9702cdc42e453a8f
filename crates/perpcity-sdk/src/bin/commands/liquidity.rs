// Liquidity sizing commands

use anyhow::Result;
use clap::{Args, Subcommand};
use perpcity_core::{
    calculate_liquidity_for_target_ratio, estimate_liquidity, price_to_sqrt_price_x96,
    scale_to_fixed6,
};
use serde_json::json;

use super::utils::print_json;

#[derive(Args)]
pub struct LiquidityCmd {
    #[command(subcommand)]
    command: LiquiditySubcommand,
}

#[derive(Subcommand)]
enum LiquiditySubcommand {
    /// Liquidity for a notional amount across a range
    Estimate {
        #[arg(long, allow_negative_numbers = true)]
        tick_lower: i32,

        #[arg(long, allow_negative_numbers = true)]
        tick_upper: i32,

        /// Notional in human units
        #[arg(long)]
        notional: f64,
    },

    /// Liquidity that holds a target margin ratio at the current price
    Target {
        /// Margin in human units
        #[arg(long)]
        margin: f64,

        #[arg(long, allow_negative_numbers = true)]
        tick_lower: i32,

        #[arg(long, allow_negative_numbers = true)]
        tick_upper: i32,

        /// Current human price
        #[arg(long)]
        price: f64,

        /// Target margin ratio as a fraction, e.g. 0.1
        #[arg(long)]
        ratio: f64,
    },
}

pub fn execute(cmd: LiquidityCmd) -> Result<()> {
    match cmd.command {
        LiquiditySubcommand::Estimate {
            tick_lower,
            tick_upper,
            notional,
        } => {
            let scaled = scale_to_fixed6(notional);
            if scaled < 0 {
                anyhow::bail!("Notional must not be negative, got {}", notional);
            }
            let liquidity = estimate_liquidity(tick_lower, tick_upper, scaled as u128)?;
            print_json(&json!({
                "tick_lower": tick_lower,
                "tick_upper": tick_upper,
                "notional_scaled": scaled.to_string(),
                "liquidity": liquidity.to_string(),
            }))
        }
        LiquiditySubcommand::Target {
            margin,
            tick_lower,
            tick_upper,
            price,
            ratio,
        } => {
            let sqrt_price = price_to_sqrt_price_x96(price)?;
            let margin_scaled = scale_to_fixed6(margin);
            let liquidity =
                calculate_liquidity_for_target_ratio(margin_scaled, tick_lower, tick_upper, sqrt_price, ratio)?;
            print_json(&json!({
                "margin_scaled": margin_scaled.to_string(),
                "sqrt_price_x96": sqrt_price.to_string(),
                "liquidity": liquidity.to_string(),
            }))
        }
    }
}
