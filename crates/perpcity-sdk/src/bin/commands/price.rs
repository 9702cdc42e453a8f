// Price, tick and sqrt-price conversion commands

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use perpcity_core::{
    align_tick_down, align_tick_up, get_sqrt_ratio_at_tick, price_range_to_ticks,
    price_to_sqrt_price_x96, price_to_tick, sqrt_price_x96_to_price, tick_to_price, U256,
};
use serde_json::json;

use super::utils::print_json;

#[derive(Args)]
pub struct PriceCmd {
    #[command(subcommand)]
    command: PriceSubcommand,
}

#[derive(Subcommand)]
enum PriceSubcommand {
    /// Human price to Q96 sqrt price
    ToSqrt {
        #[arg(long)]
        price: f64,
    },

    /// Q96 sqrt price (decimal) to human price
    FromSqrt {
        #[arg(long)]
        sqrt_price: String,
    },

    /// Human price to tick
    ToTick {
        #[arg(long)]
        price: f64,

        /// Round up instead of down
        #[arg(long)]
        round_up: bool,
    },

    /// Tick to human price and exact sqrt ratio
    FromTick {
        #[arg(long, allow_negative_numbers = true)]
        tick: i32,
    },

    /// Align a tick to a spacing in both directions
    Align {
        #[arg(long, allow_negative_numbers = true)]
        tick: i32,

        #[arg(long)]
        spacing: i32,
    },

    /// Aligned tick range covering a price band
    Range {
        #[arg(long)]
        price_lower: f64,

        #[arg(long)]
        price_upper: f64,

        #[arg(long, default_value = "60")]
        spacing: i32,
    },
}

pub fn execute(cmd: PriceCmd) -> Result<()> {
    match cmd.command {
        PriceSubcommand::ToSqrt { price } => {
            let sqrt_price = price_to_sqrt_price_x96(price)?;
            print_json(&json!({
                "price": price,
                "sqrt_price_x96": sqrt_price.to_string(),
            }))
        }
        PriceSubcommand::FromSqrt { sqrt_price } => {
            let value = U256::from_dec_str(&sqrt_price)
                .map_err(|e| anyhow::anyhow!("{:?}", e))
                .with_context(|| format!("Invalid sqrt price: {}", sqrt_price))?;
            print_json(&json!({
                "sqrt_price_x96": sqrt_price,
                "price": sqrt_price_x96_to_price(value)?,
            }))
        }
        PriceSubcommand::ToTick { price, round_up } => print_json(&json!({
            "price": price,
            "tick": price_to_tick(price, !round_up)?,
        })),
        PriceSubcommand::FromTick { tick } => print_json(&json!({
            "tick": tick,
            "price": tick_to_price(tick),
            "sqrt_ratio_x96": get_sqrt_ratio_at_tick(tick).to_string(),
        })),
        PriceSubcommand::Align { tick, spacing } => print_json(&json!({
            "tick": tick,
            "spacing": spacing,
            "down": align_tick_down(tick, spacing)?,
            "up": align_tick_up(tick, spacing)?,
        })),
        PriceSubcommand::Range {
            price_lower,
            price_upper,
            spacing,
        } => {
            let range = price_range_to_ticks(price_lower, price_upper, spacing)?;
            print_json(&json!({
                "tick_lower": range.tick_lower(),
                "tick_upper": range.tick_upper(),
                "price_lower": tick_to_price(range.tick_lower()),
                "price_upper": tick_to_price(range.tick_upper()),
            }))
        }
    }
}
