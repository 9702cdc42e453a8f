//! # Position State
//!
//! Raw on-chain position state and the metrics derived from it.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::NUMBER_1E6_F64;

/// Margin ratio thresholds of a position, each scaled by 10^6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct MarginRatioBounds {
    pub min: u64,
    pub max: u64,
    /// Ratio at which the position becomes liquidatable
    pub liquidation: u64,
}

impl MarginRatioBounds {
    /// Liquidation ratio as a fraction
    pub fn liquidation_fraction(&self) -> f64 {
        self.liquidation as f64 / NUMBER_1E6_F64
    }
}

/// Position state as stored by the perp manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct RawPositionState {
    /// Posted margin, 6 decimals
    pub margin: i128,
    /// Base amount at entry, 6 decimals, negative for shorts
    pub entry_base_delta: i128,
    /// Quote amount at entry, 6 decimals
    pub entry_quote_delta: i128,
    pub margin_ratio_bounds: MarginRatioBounds,
}

impl RawPositionState {
    /// Margin in human units
    pub fn margin_human(&self) -> f64 {
        self.margin as f64 / NUMBER_1E6_F64
    }
}

/// Close quote for a live position, in human units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct LiveDetails {
    pub pnl: f64,
    pub funding_payment: f64,
    /// Margin left after pnl and funding
    pub effective_margin: f64,
    pub is_liquidatable: bool,
}

/// Every risk metric of a position at one mark price
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PositionMetrics {
    pub entry_price: f64,
    /// Signed base size, human units
    pub size: f64,
    pub value: f64,
    /// `f64::INFINITY` when effective margin is exhausted
    #[cfg_attr(feature = "client", serde(with = "non_finite"))]
    pub leverage: f64,
    pub liquidation_price: Option<f64>,
}

/// Serde for floats that may be infinite
///
/// Finite values stay JSON numbers; `inf`, `-inf` and `nan` are written as
/// strings so they read back unchanged.
#[cfg(feature = "client")]
mod non_finite {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(de::Error::custom(format!("expected a number or inf, got {}", other))),
            },
        }
    }
}
