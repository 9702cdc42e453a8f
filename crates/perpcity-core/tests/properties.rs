// Property-based tests for rounding direction and monotonicity
// Run with: cargo test -p perpcity-core --test properties

use perpcity_core::*;
use proptest::prelude::*;

// ============================================================
// FIXED-POINT ROUNDING
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: scale_to_fixed6 is the floor of the scaled float
    #[test]
    fn prop_fixed6_is_floor(amount in -1.0e9f64..1.0e9f64) {
        let product = amount * 1_000_000.0;
        let scaled = scale_to_fixed6(amount) as f64;
        prop_assert!(scaled <= product);
        prop_assert!(product < scaled + 1.0);
    }

    /// Property: negative amounts round away from zero
    #[test]
    fn prop_fixed6_negative_rounds_down(amount in 1.0e-9f64..1.0e9f64) {
        let expected = -((amount * 1_000_000.0).ceil() as i128);
        prop_assert_eq!(scale_to_fixed6(-amount), expected);
    }

    /// Property: scale_to_q96 brackets the exact quotient from below
    #[test]
    fn prop_q96_is_floor(amount in -1.0e9f64..1.0e9f64) {
        let scaled = scale_to_fixed6(amount);
        let value = scale_to_q96(amount);
        let exact = U256::from(scaled.unsigned_abs()) << 96;
        let one_e6 = U256::from(1_000_000u64);

        prop_assert_eq!(value.negative, scaled < 0);
        if value.negative {
            // -magnitude <= exact / 1e6 < -magnitude + 1
            prop_assert!(value.magnitude * one_e6 >= exact);
            prop_assert!((value.magnitude - U256::one()) * one_e6 < exact);
        } else {
            prop_assert!(value.magnitude * one_e6 <= exact);
            prop_assert!((value.magnitude + U256::one()) * one_e6 > exact);
        }
    }

    /// Property: scale_from_q96 never rounds a value up
    #[test]
    fn prop_from_q96_rounds_down(amount in -1.0e6f64..1.0e6f64) {
        let value = scale_to_q96(amount);
        let back = scale_from_q96(value);
        prop_assert!(back <= amount + 1e-9);
        prop_assert!(amount - back < 3.0e-6);
    }
}

// ============================================================
// TICK MATH
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: the sqrt ratio is strictly increasing in the tick
    #[test]
    fn prop_sqrt_ratio_increasing(tick in (MIN_TICK)..(MAX_TICK)) {
        prop_assert!(get_sqrt_ratio_at_tick(tick) < get_sqrt_ratio_at_tick(tick + 1));
    }

    /// Property: rounding down never lands above rounding up
    #[test]
    fn prop_price_to_tick_ordering(price in 1.0e-6f64..1.0e6f64) {
        let down = price_to_tick(price, true).unwrap();
        let up = price_to_tick(price, false).unwrap();
        prop_assert!(down <= up);
        prop_assert!(up - down <= 1);
    }

    /// Property: aligned ticks are the nearest multiples on each side
    #[test]
    fn prop_alignment(tick in -887_272i32..887_272i32, spacing in 1i32..1000i32) {
        let down = align_tick_down(tick, spacing).unwrap();
        let up = align_tick_up(tick, spacing).unwrap();
        prop_assert_eq!(down.rem_euclid(spacing), 0);
        prop_assert_eq!(up.rem_euclid(spacing), 0);
        prop_assert!(down <= tick && tick - down < spacing);
        prop_assert!(up >= tick && up - tick < spacing);
    }
}

// ============================================================
// LIQUIDITY
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Property: liquidity is linear in notional up to one unit of rounding
    #[test]
    fn prop_liquidity_linear(
        tick_lower in -50_000i32..50_000i32,
        width in 1i32..20_000i32,
        notional in 1u128..1_000_000_000_000u128
    ) {
        let tick_upper = tick_lower + width;
        let single = estimate_liquidity(tick_lower, tick_upper, notional).unwrap();
        let double = estimate_liquidity(tick_lower, tick_upper, notional * 2).unwrap();
        prop_assert!(double.abs_diff(single * 2) <= 1);
    }

    /// Property: narrowing a symmetric range never lowers liquidity
    #[test]
    fn prop_liquidity_narrowing(
        half_width in 2i32..50_000i32,
        notional in 1_000_000u128..1_000_000_000_000u128
    ) {
        let wide = estimate_liquidity(-half_width, half_width, notional).unwrap();
        let narrow = estimate_liquidity(-half_width / 2, half_width / 2, notional).unwrap();
        prop_assert!(narrow > wide);
    }

    /// Property: a long liquidates below entry and a short above it
    #[test]
    fn prop_liquidation_side(
        base in 1i128..1_000_000_000i128,
        entry in 1.0f64..10_000.0f64,
        liquidation in 1u64..200_000u64
    ) {
        let quote = (base as f64 * entry) as i128;
        let entry_notional = quote as f64 / 1_000_000.0;
        // comfortably above the liquidation requirement
        let margin = ((entry_notional * liquidation as f64 / 1_000_000.0 + 1.0) * 1_000_000.0) as i128;
        let bounds = MarginRatioBounds { min: 100_000, max: 500_000, liquidation };

        let long = RawPositionState {
            margin,
            entry_base_delta: base,
            entry_quote_delta: quote,
            margin_ratio_bounds: bounds,
        };
        let short = RawPositionState {
            entry_base_delta: -base,
            entry_quote_delta: -quote,
            ..long
        };

        let long_price = liquidation_price(&long, true).unwrap();
        let short_price = liquidation_price(&short, false).unwrap();
        let entry = entry_price(&long);
        prop_assert!(long_price < entry && long_price >= 0.0);
        prop_assert!(short_price > entry);
    }
}
