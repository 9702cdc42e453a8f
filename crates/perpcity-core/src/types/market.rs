//! # Market Types
//!
//! Perp market configuration, fee schedule and leverage bounds.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use primitive_types::U256;

use crate::constants::NUMBER_1E6_F64;
use crate::errors::CoreResult;
use crate::risk::leverage::margin_ratio_to_leverage;
use crate::types::state::MarginRatioBounds;

/// Fee schedule of a perp, each rate as a fraction of notional
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct Fees {
    pub creator: f64,
    pub insurance: f64,
    pub lp: f64,
    pub liquidation: f64,
}

impl Fees {
    /// Build from 10^6-scaled on-chain fee constants
    pub fn from_scaled(creator: u64, insurance: u64, lp: u64, liquidation: u64) -> Self {
        let scale = |fee: u64| fee as f64 / NUMBER_1E6_F64;
        Self {
            creator: scale(creator),
            insurance: scale(insurance),
            lp: scale(lp),
            liquidation: scale(liquidation),
        }
    }

    /// Rate charged when a taker opens, protocol fee included
    pub fn open_rate(&self, protocol_fee_rate: f64) -> f64 {
        self.creator + self.insurance + self.lp + protocol_fee_rate
    }
}

/// Taker limits of a perp market
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct MarketBounds {
    /// Human units
    pub min_margin: f64,
    pub min_taker_leverage: f64,
    pub max_taker_leverage: f64,
    /// Fraction, not 10^6-scaled
    pub liquidation_taker_ratio: f64,
}

impl MarketBounds {
    /// Derive leverage bounds from the taker margin ratios
    ///
    /// The largest margin ratio gives the smallest leverage and vice versa.
    pub fn from_margin_ratios(ratios: &MarginRatioBounds, min_margin: f64) -> CoreResult<Self> {
        Ok(Self {
            min_margin,
            min_taker_leverage: margin_ratio_to_leverage(ratio_as_i64(ratios.max))?,
            max_taker_leverage: margin_ratio_to_leverage(ratio_as_i64(ratios.min))?,
            liquidation_taker_ratio: ratios.liquidation_fraction(),
        })
    }

    /// Whether `leverage` lies within the taker bounds
    pub fn allows_leverage(&self, leverage: f64) -> bool {
        leverage >= self.min_taker_leverage && leverage <= self.max_taker_leverage
    }
}

fn ratio_as_i64(ratio: u64) -> i64 {
    i64::try_from(ratio).unwrap_or(i64::MAX)
}

/// Uniswap-style pool key backing a perp
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PoolKey {
    pub currency0: String,
    pub currency1: String,
    pub fee: u32,
    pub tick_spacing: i32,
    pub hooks: String,
}

/// Static configuration of a perp: pool key and module addresses
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PerpConfig {
    pub key: PoolKey,
    pub creator: String,
    pub vault: String,
    pub beacon: String,
    pub fees: String,
    pub margin_ratios: String,
    pub lockup_period: String,
    pub sqrt_price_impact_limit: String,
}

/// Market snapshot of a perp at its current mark
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PerpData {
    pub id: String,
    pub tick_spacing: i32,
    /// One-second TWAP the mark is derived from
    pub sqrt_price_x96: U256,
    /// Mark price from the one-second TWAP
    pub mark: f64,
    pub beacon: String,
    pub bounds: MarketBounds,
    pub fees: Fees,
}
