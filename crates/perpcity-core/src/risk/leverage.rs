//! # Leverage Math
//!
//! Margin ratios are 10^6-scaled fractions of notional; leverage is their
//! inverse. Taker sizing turns a margin and a margin ratio into the notional
//! and the fees the perp manager will charge on open.

use crate::constants::{NUMBER_1E6, NUMBER_1E6_F64};
use crate::errors::{CoreError, CoreResult};
use crate::types::Fees;

/// `10^6 / margin_ratio`
pub fn margin_ratio_to_leverage(margin_ratio: i64) -> CoreResult<f64> {
    if margin_ratio <= 0 {
        return Err(CoreError::InvalidInput(format!(
            "Margin ratio must be greater than 0, got {}",
            margin_ratio
        )));
    }
    Ok(NUMBER_1E6_F64 / margin_ratio as f64)
}

/// `floor(10^6 / leverage)`
///
/// Leverage above 10^6 would floor to a zero ratio and is rejected.
pub fn leverage_to_margin_ratio(leverage: f64) -> CoreResult<u64> {
    if !(leverage > 0.0) || !leverage.is_finite() {
        return Err(CoreError::InvalidInput(format!(
            "Leverage must be greater than 0, got {}",
            leverage
        )));
    }

    let ratio = (NUMBER_1E6_F64 / leverage).floor();
    if ratio < 1.0 {
        return Err(CoreError::InvalidInput(format!(
            "Leverage {} is too large: margin ratio floors to 0",
            leverage
        )));
    }
    Ok(ratio as u64)
}

/// Notional a taker opens: `floor(margin * 10^6 / margin_ratio)`
pub fn taker_notional(margin_scaled: i128, margin_ratio: u64) -> CoreResult<u128> {
    if margin_ratio == 0 {
        return Err(CoreError::InvalidInput(
            "Margin ratio must be greater than 0, got 0".to_string(),
        ));
    }
    if margin_scaled <= 0 {
        return Err(CoreError::InvalidInput(format!(
            "Margin must be greater than 0, got {}",
            margin_scaled
        )));
    }

    let numerator = (margin_scaled as u128)
        .checked_mul(NUMBER_1E6 as u128)
        .ok_or_else(|| CoreError::overflow("taker_notional", format!("margin {} * 10^6", margin_scaled)))?;

    Ok(numerator / margin_ratio as u128)
}

/// Fees charged on a taker open, rounded up
pub fn taker_open_fees(notional_scaled: u128, fees: &Fees, protocol_fee_rate: f64) -> u128 {
    (notional_scaled as f64 * fees.open_rate(protocol_fee_rate)).ceil() as u128
}
