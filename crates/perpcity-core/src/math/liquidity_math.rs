//! # Liquidity Math
//!
//! Sizing the liquidity constant of a maker position, either from a notional
//! amount or from the margin ratio the maker wants to hold.

use primitive_types::U256;

use crate::constants::NUMBER_1E6_F64;
use crate::errors::{CoreError, CoreResult};
use crate::math::big_int::{mul_div, narrow_u256, q96, Rounding};
use crate::math::tick_math::{get_sqrt_ratio_at_tick, sqrt_price_x96_to_price, tick_to_price};

/// Liquidity that spans `[tick_lower, tick_upper]` for a 10^6-scaled notional
///
/// `floor(notional * 2^96 / (sqrt_upper - sqrt_lower))` with exact sqrt
/// ratios from the tick table.
pub fn estimate_liquidity(tick_lower: i32, tick_upper: i32, notional_scaled: u128) -> CoreResult<u128> {
    if tick_lower >= tick_upper {
        return Err(CoreError::invalid_tick_range(tick_lower, tick_upper));
    }

    if notional_scaled == 0 {
        return Ok(0);
    }

    let sqrt_lower = get_sqrt_ratio_at_tick(tick_lower);
    let sqrt_upper = get_sqrt_ratio_at_tick(tick_upper);

    if sqrt_upper <= sqrt_lower {
        return Err(CoreError::ArithmeticError(format!(
            "Division by zero: sqrt price difference is 0 for ticks {} to {} (sqrt_lower={}, sqrt_upper={})",
            tick_lower, tick_upper, sqrt_lower, sqrt_upper
        )));
    }

    let liquidity = mul_div(
        U256::from(notional_scaled),
        q96(),
        sqrt_upper - sqrt_lower,
        Rounding::Down,
    )?;

    narrow_u256(liquidity, "estimate_liquidity")
}

/// Liquidity that makes a maker position carry `target_margin_ratio`
///
/// The debt one unit of liquidity represents depends on where the current
/// price sits relative to the range:
/// - at or below the lower bound the position is all base, valued at the
///   current price
/// - at or above the upper bound it is all quote
/// - inside the range it holds both
///
/// Evaluated in `f64`, then floored.
pub fn calculate_liquidity_for_target_ratio(
    margin_scaled: i128,
    tick_lower: i32,
    tick_upper: i32,
    current_sqrt_price_x96: U256,
    target_margin_ratio: f64,
) -> CoreResult<u128> {
    if tick_lower >= tick_upper {
        return Err(CoreError::invalid_tick_range(tick_lower, tick_upper));
    }

    if margin_scaled == 0 {
        return Ok(0);
    }

    if !(target_margin_ratio > 0.0) {
        return Err(CoreError::InvalidInput(format!(
            "Invalid target margin ratio: {} must be positive",
            target_margin_ratio
        )));
    }

    let price_lower = tick_to_price(tick_lower);
    let price_upper = tick_to_price(tick_upper);
    let current_price = sqrt_price_x96_to_price(current_sqrt_price_x96)?;

    let sqrt_current = current_price.sqrt();
    let sqrt_lower = price_lower.sqrt();
    let sqrt_upper = price_upper.sqrt();

    let debt_per_liquidity = if current_price <= price_lower {
        let base_per_liquidity = 1.0 / sqrt_lower - 1.0 / sqrt_upper;
        base_per_liquidity * current_price
    } else if current_price >= price_upper {
        sqrt_upper - sqrt_lower
    } else {
        let base_per_liquidity = 1.0 / sqrt_current - 1.0 / sqrt_upper;
        let quote_per_liquidity = sqrt_current - sqrt_lower;
        base_per_liquidity * current_price + quote_per_liquidity
    };

    if !(debt_per_liquidity > 0.0) {
        return Err(CoreError::ArithmeticError(format!(
            "Calculated debt per unit liquidity is zero or negative ({}) for ticks {} to {} at price {}",
            debt_per_liquidity, tick_lower, tick_upper, current_price
        )));
    }

    let margin = margin_scaled as f64 / NUMBER_1E6_F64;
    let target_debt = margin / target_margin_ratio;
    let liquidity = target_debt / debt_per_liquidity;

    if !(liquidity > 0.0) {
        return Err(CoreError::ArithmeticError(format!(
            "Calculated liquidity is zero or negative ({})",
            liquidity
        )));
    }

    let liquidity = liquidity.floor();
    if liquidity >= u128::MAX as f64 {
        return Err(CoreError::overflow(
            "calculate_liquidity_for_target_ratio",
            format!("{} exceeds 128 bits", liquidity),
        ));
    }

    Ok(liquidity as u128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn within_one(actual: u128, expected: u128) -> bool {
        actual.abs_diff(expected) <= 1
    }

    #[test]
    fn test_estimate_liquidity_reference_values() {
        assert_eq!(estimate_liquidity(-100, 100, 1_000_000_000).unwrap(), 100_004_583_272);
        assert_eq!(estimate_liquidity(-1000, 1000, 1_000_000_000).unwrap(), 9_996_334_748);
        assert_eq!(estimate_liquidity(0, 10, 100_000_000).unwrap(), 199_960_003_999);
    }

    #[test]
    fn test_estimate_liquidity_zero_notional() {
        assert_eq!(estimate_liquidity(-100, 100, 0).unwrap(), 0);
    }

    #[test]
    fn test_estimate_liquidity_rejects_inverted_range() {
        let err = estimate_liquidity(100, -100, 1_000_000).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("tick_lower (100)"));
        assert!(err.to_string().contains("tick_upper (-100)"));

        assert!(estimate_liquidity(50, 50, 1_000_000).is_err());
    }

    #[test]
    fn test_estimate_liquidity_narrower_range_needs_more_liquidity() {
        let wide = estimate_liquidity(-1000, 1000, 1_000_000_000).unwrap();
        let narrow = estimate_liquidity(-100, 100, 1_000_000_000).unwrap();
        assert!(narrow > wide);
    }

    #[test]
    fn test_estimate_liquidity_scales_with_notional() {
        let single = estimate_liquidity(-500, 700, 1_000_000_000).unwrap();
        let double = estimate_liquidity(-500, 700, 2_000_000_000).unwrap();
        assert!(double.abs_diff(2 * single) <= 1);
    }

    #[test]
    fn test_target_ratio_reference_values() {
        let q = q96();
        assert!(within_one(
            calculate_liquidity_for_target_ratio(100_000_000, -1000, 1000, q, 0.1).unwrap(),
            10_252
        ));
        // price 1 sits above the range
        assert!(within_one(
            calculate_liquidity_for_target_ratio(100_000_000, -2000, -1000, q, 0.1).unwrap(),
            21_556
        ));
        // price 1 sits below the range
        assert!(within_one(
            calculate_liquidity_for_target_ratio(100_000_000, 1000, 2000, q, 0.1).unwrap(),
            21_556
        ));
    }

    #[test]
    fn test_target_ratio_price_on_range_edge() {
        let q = q96();
        // price 1 on the lower edge takes the all-base branch
        let at_lower = calculate_liquidity_for_target_ratio(100_000_000, 0, 1000, q, 0.1).unwrap();
        assert!(within_one(at_lower, 20_505));

        // price 1 on the upper edge takes the all-quote branch
        let at_upper = calculate_liquidity_for_target_ratio(100_000_000, -1000, 0, q, 0.1).unwrap();
        assert!(within_one(at_upper, 20_505));

        // both edges agree with the in-range formula evaluated there
        let price_lower = tick_to_price(-1000);
        let inside_debt = 1.0 - price_lower.sqrt();
        assert!(within_one(at_upper, (1000.0 / inside_debt).floor() as u128));
    }

    #[test]
    fn test_target_ratio_edge_cases() {
        let q = q96();
        assert_eq!(calculate_liquidity_for_target_ratio(0, -1000, 1000, q, 0.1).unwrap(), 0);

        let err = calculate_liquidity_for_target_ratio(100_000_000, -1000, 1000, q, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = calculate_liquidity_for_target_ratio(100_000_000, 1000, -1000, q, 0.1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        // a zero price leaves no debt below the range
        let err = calculate_liquidity_for_target_ratio(100_000_000, -1000, 1000, U256::zero(), 0.1)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arithmetic);

        let err = calculate_liquidity_for_target_ratio(-100_000_000, -1000, 1000, q, 0.1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Arithmetic);
    }

    #[test]
    fn test_higher_target_ratio_means_less_liquidity() {
        let q = q96();
        let tight = calculate_liquidity_for_target_ratio(100_000_000, -1000, 1000, q, 0.05).unwrap();
        let loose = calculate_liquidity_for_target_ratio(100_000_000, -1000, 1000, q, 0.2).unwrap();
        assert!(tight > loose);
    }
}
