// Position risk commands

use anyhow::Result;
use clap::{Args, Subcommand};
use perpcity_core::{
    leverage_to_margin_ratio, margin_ratio_to_leverage, position_metrics, scale_to_fixed6,
    MarginRatioBounds, RawPositionState,
};
use serde_json::json;

use super::utils::print_json;

#[derive(Args)]
pub struct RiskCmd {
    #[command(subcommand)]
    command: RiskSubcommand,
}

#[derive(Subcommand)]
enum RiskSubcommand {
    /// Entry price, value, leverage and liquidation price of a position
    Position {
        /// Posted margin in human units
        #[arg(long)]
        margin: f64,

        /// Entry base delta, 6 decimals, negative for shorts
        #[arg(long, allow_negative_numbers = true)]
        base_delta: i128,

        /// Entry quote delta, 6 decimals
        #[arg(long, allow_negative_numbers = true)]
        quote_delta: i128,

        /// Liquidation margin ratio, 6 decimals
        #[arg(long, default_value = "50000")]
        liquidation_ratio: u64,

        /// Current mark price
        #[arg(long)]
        mark: f64,

        /// Margin left after pnl and funding, human units
        #[arg(long, allow_negative_numbers = true)]
        effective_margin: f64,

        /// Treat the position as a short
        #[arg(long)]
        short: bool,
    },

    /// Convert between leverage and a 6-decimal margin ratio
    Leverage {
        #[arg(long, conflicts_with = "margin_ratio")]
        leverage: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        margin_ratio: Option<i64>,
    },
}

pub fn execute(cmd: RiskCmd) -> Result<()> {
    match cmd.command {
        RiskSubcommand::Position {
            margin,
            base_delta,
            quote_delta,
            liquidation_ratio,
            mark,
            effective_margin,
            short,
        } => {
            let state = RawPositionState {
                margin: scale_to_fixed6(margin),
                entry_base_delta: base_delta,
                entry_quote_delta: quote_delta,
                margin_ratio_bounds: MarginRatioBounds {
                    liquidation: liquidation_ratio,
                    ..MarginRatioBounds::default()
                },
            };
            let metrics = position_metrics(&state, mark, effective_margin, !short);
            print_json(&metrics)
        }
        RiskSubcommand::Leverage {
            leverage,
            margin_ratio,
        } => match (leverage, margin_ratio) {
            (Some(leverage), None) => print_json(&json!({
                "leverage": leverage,
                "margin_ratio": leverage_to_margin_ratio(leverage)?,
            })),
            (None, Some(margin_ratio)) => print_json(&json!({
                "margin_ratio": margin_ratio,
                "leverage": margin_ratio_to_leverage(margin_ratio)?,
            })),
            _ => anyhow::bail!("Pass exactly one of --leverage or --margin-ratio"),
        },
    }
}
