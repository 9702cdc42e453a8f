// Trade planning against an in-memory market
//
// Seeds a MockLedger with a single perp at the given price so the SDK's
// planning path can be run without a chain.

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};
use perpcity_core::price_to_sqrt_price_x96;
use perpcity_sdk::{
    testing::{address, MockLedger, MockPerp},
    ClosePositionParams, MakerLiquidity, OpenMakerParams, OpenTakerParams, PerpCityClient,
    SdkConfig, DEFAULT_CHAIN_ID,
};
use tracing::info;

use super::utils::print_json;

const PERP_ID: &str = "0x00000000000000000000000000000000000000000000000000000000000000aa";

#[derive(Args)]
pub struct PlanCmd {
    /// Mark price of the in-memory perp
    #[arg(long, default_value = "100")]
    price: f64,

    /// Tick spacing of the in-memory perp
    #[arg(long, default_value = "60")]
    tick_spacing: i32,

    #[command(subcommand)]
    command: PlanSubcommand,
}

#[derive(Subcommand)]
enum PlanSubcommand {
    /// Taker open: margin ratio, notional, fees and approval
    Taker {
        #[arg(long)]
        margin: f64,

        #[arg(long)]
        leverage: f64,

        #[arg(long)]
        short: bool,
    },

    /// Maker open: aligned ticks and liquidity
    Maker {
        #[arg(long)]
        margin: f64,

        #[arg(long)]
        price_lower: f64,

        #[arg(long)]
        price_upper: f64,

        /// Explicit liquidity constant
        #[arg(long, conflicts_with = "target_ratio")]
        liquidity: Option<u128>,

        /// Size liquidity for this margin ratio instead
        #[arg(long, default_value = "0.1")]
        target_ratio: f64,
    },

    /// Close limits in contract units
    Close {
        #[arg(long)]
        position_id: u64,

        #[arg(long, default_value = "0")]
        min_amt0_out: f64,

        #[arg(long, default_value = "0")]
        min_amt1_out: f64,

        #[arg(long, default_value = "0")]
        max_amt1_in: f64,
    },
}

pub async fn execute(cmd: PlanCmd) -> Result<()> {
    let config = SdkConfig::new("memory://perpcity", address(0x01), address(0x02));
    let ledger = MockLedger::new(DEFAULT_CHAIN_ID);
    let perp = MockPerp::new(cmd.tick_spacing, price_to_sqrt_price_x96(cmd.price)?);
    ledger.install_perp(&config.perp_manager, &perp).await;

    let client = PerpCityClient::connect(config, Arc::new(ledger)).await?;
    info!("In-memory perp {} at price {}", PERP_ID, cmd.price);

    match cmd.command {
        PlanSubcommand::Taker {
            margin,
            leverage,
            short,
        } => {
            let params = OpenTakerParams {
                is_long: !short,
                margin,
                leverage,
                unspecified_amount_limit: 0,
            };
            print_json(&client.trade.plan_taker_open(PERP_ID, &params).await?)
        }
        PlanSubcommand::Maker {
            margin,
            price_lower,
            price_upper,
            liquidity,
            target_ratio,
        } => {
            let params = OpenMakerParams {
                margin,
                price_lower,
                price_upper,
                liquidity: match liquidity {
                    Some(liquidity) => MakerLiquidity::Explicit(liquidity),
                    None => MakerLiquidity::TargetMarginRatio(target_ratio),
                },
                max_amt0_in: u128::MAX,
                max_amt1_in: u128::MAX,
            };
            print_json(&client.trade.plan_maker_open(PERP_ID, &params).await?)
        }
        PlanSubcommand::Close {
            position_id,
            min_amt0_out,
            min_amt1_out,
            max_amt1_in,
        } => {
            let params = ClosePositionParams {
                min_amt0_out,
                min_amt1_out,
                max_amt1_in,
            };
            print_json(&client.trade.plan_close(position_id, &params))
        }
    }
}
