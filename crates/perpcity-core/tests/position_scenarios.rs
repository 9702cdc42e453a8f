//! # Position Scenarios
//!
//! End-to-end flows through the core: a taker's risk view at a new mark and
//! a maker's range sizing from human prices.

use perpcity_core::*;

fn state(margin: i128, base: i128, quote: i128) -> RawPositionState {
    RawPositionState {
        margin,
        entry_base_delta: base,
        entry_quote_delta: quote,
        margin_ratio_bounds: MarginRatioBounds {
            min: 100_000,
            max: 500_000,
            liquidation: 50_000,
        },
    }
}

#[test]
fn test_long_position_gains_value() {
    let long = state(100_000_000, 1_000_000, 50_000_000);

    assert_eq!(entry_price(&long), 50.0);
    assert_eq!(position_size(&long), 1.0);
    assert_eq!(position_value(&long, 60.0), 60.0);

    let lev = leverage(position_value(&long, 60.0), 110.0);
    assert!((lev - 0.545).abs() < 1e-3);
}

#[test]
fn test_losing_short_position() {
    let short = state(100_000_000, -2_000_000, -100_000_000);
    let metrics = position_metrics(&short, 60.0, 80.0, false);

    assert_eq!(metrics.entry_price, 50.0);
    assert_eq!(metrics.size, -2.0);
    assert_eq!(metrics.value, 120.0);
    assert_eq!(metrics.leverage, 1.5);

    let liquidation = metrics.liquidation_price.unwrap();
    assert!(liquidation > 60.0);
    assert!((liquidation - 97.5).abs() < 1e-9);
}

#[test]
fn test_wiped_out_position() {
    let long = state(100_000_000, 1_000_000, 50_000_000);
    let metrics = position_metrics(&long, 20.0, -3.0, true);
    assert_eq!(metrics.leverage, f64::INFINITY);

    let flat = state(100_000_000, 0, 0);
    let metrics = position_metrics(&flat, 20.0, 100.0, true);
    assert_eq!(metrics.liquidation_price, None);
    assert_eq!(metrics.value, 0.0);
}

#[test]
fn test_taker_open_sizing() {
    let margin = scale_to_fixed6(100.0);
    let ratio = leverage_to_margin_ratio(5.0).unwrap();
    assert_eq!(ratio, 200_000);

    let notional = taker_notional(margin, ratio).unwrap();
    assert_eq!(notional, 500_000_000);

    let fees = Fees::from_scaled(1_000, 500, 2_500, 10_000);
    let total_fees = taker_open_fees(notional, &fees, 0.001);
    assert_eq!(total_fees, 2_500_000);

    let bounds = MarketBounds::from_margin_ratios(
        &MarginRatioBounds {
            min: 100_000,
            max: 500_000,
            liquidation: 50_000,
        },
        DEFAULT_MIN_MARGIN,
    )
    .unwrap();
    assert!(bounds.allows_leverage(margin_ratio_to_leverage(ratio as i64).unwrap()));
}

#[test]
fn test_maker_range_sizing() {
    let current = price_to_sqrt_price_x96(100.0).unwrap();
    let range = price_range_to_ticks(90.0, 110.0, 10).unwrap();

    assert_eq!(range.tick_lower() % 10, 0);
    assert_eq!(range.tick_upper() % 10, 0);
    assert!(range.contains(price_to_tick(100.0, true).unwrap()));

    let by_notional = estimate_liquidity(range.tick_lower(), range.tick_upper(), 1_000_000_000).unwrap();
    assert!(by_notional > 0);

    let by_ratio = calculate_liquidity_for_target_ratio(
        scale_to_fixed6(100.0),
        range.tick_lower(),
        range.tick_upper(),
        current,
        0.1,
    )
    .unwrap();
    let looser = calculate_liquidity_for_target_ratio(
        scale_to_fixed6(100.0),
        range.tick_lower(),
        range.tick_upper(),
        current,
        0.2,
    )
    .unwrap();
    assert!(by_ratio > looser);
}
