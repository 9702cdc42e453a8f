//! # Tick Math
//!
//! Conversions between human prices, tick indices and Q96 square-root prices.
//!
//! `get_sqrt_ratio_at_tick` reproduces the pool's bit-decomposition of
//! `sqrt(1.0001)^tick` exactly, so its output can be compared bit-for-bit
//! against on-chain values. The float conversions (`price_to_tick`,
//! `tick_to_price`) are approximations used for quoting only.

use primitive_types::{U256, U512};

use crate::constants::{NUMBER_1E6, Q128_RESOLUTION, Q96_RESOLUTION, TICK_BASE};
use crate::errors::{CoreError, CoreResult};
use crate::math::big_int::{f64_to_u256, mul_shr, narrow_u512};
use crate::math::fixed_point::{scale_from_q96, X96Amount};
use crate::types::PriceRange;

/// Seed ratio used when bit 0 of `|tick|` is set: `2^128 / sqrt(1.0001)`
const SQRT_RATIO_BIT_0: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

/// `2^128 / sqrt(1.0001)^(2^i)` for bits 1 through 19 of `|tick|`
const SQRT_RATIO_FACTORS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a, // 2^1
    0xfff2e50f5f656932ef12357cf3c7fdcc, // 2^2
    0xffe5caca7e10e4e61c3624eaa0941cd0, // 2^3
    0xffcb9843d60f6159c9db58835c926644, // 2^4
    0xff973b41fa98c081472e6896dfb254c0, // 2^5
    0xff2ea16466c96a3843ec78b326b52861, // 2^6
    0xfe5dee046a99a2a811c461f1969c3053, // 2^7
    0xfcbe86c7900a88aedcffc83b479aa3a4, // 2^8
    0xf987a7253ac413176f2b074cf7815e54, // 2^9
    0xf3392b0822b70005940c7a398e4b70f3, // 2^10
    0xe7159475a2c29b7443b29c7fa6e889d9, // 2^11
    0xd097f3bdfd2022b8845ad8f792aa5825, // 2^12
    0xa9f746462d870fdf8a65dc1f90e061e5, // 2^13
    0x70d869a156d2a1b890bb3df62baf32f7, // 2^14
    0x31be135f97d08fd981231505542fcfa6, // 2^15
    0x09aa508b5b7a84e1c677de54f3e99bc9, // 2^16
    0x005d6af8dedb81196699c329225ee604, // 2^17
    0x00002216e584f5fa1ea926041bedfe98, // 2^18
    0x00000000048a170391f7dc42444e8fa2, // 2^19
];

/// Convert a human price to a Q96 square-root price
///
/// Rounds in two stages, `floor(sqrt(price) * 10^6) * 2^96 / 10^6`, which is
/// what the contract expects as a starting price.
pub fn price_to_sqrt_price_x96(price: f64) -> CoreResult<U256> {
    if !(price > 0.0) || !price.is_finite() {
        return Err(CoreError::non_positive_price(price));
    }

    let scaled_root = (price.sqrt() * NUMBER_1E6 as f64).floor();
    let root = f64_to_u256(scaled_root).ok_or_else(|| {
        CoreError::overflow(
            "price_to_sqrt_price_x96",
            format!("sqrt of {} does not fit 256 bits after scaling", price),
        )
    })?;

    // root < 2^256, so the shifted numerator fits 512 bits
    let numerator = U512::from(root) << Q96_RESOLUTION as usize;
    narrow_u512(
        numerator / U512::from(NUMBER_1E6 as u128),
        "price_to_sqrt_price_x96",
    )
}

/// Convert a Q96 square-root price back to a human price
///
/// `floor(sqrt_price^2 / 2^96)` is computed exactly before scaling down.
/// Zero maps to zero.
pub fn sqrt_price_x96_to_price(sqrt_price_x96: U256) -> CoreResult<f64> {
    let price_x96 = mul_shr(
        sqrt_price_x96,
        sqrt_price_x96,
        Q96_RESOLUTION,
        "sqrt_price_x96_to_price",
    )?;
    Ok(scale_from_q96(X96Amount::positive(price_x96)))
}

/// Convert a price to its (unaligned) tick, rounding down or up
pub fn price_to_tick(price: f64, round_down: bool) -> CoreResult<i32> {
    if !(price > 0.0) || !price.is_finite() {
        return Err(CoreError::non_positive_price(price));
    }

    let raw = price.ln() / TICK_BASE.ln();
    let tick = if round_down { raw.floor() } else { raw.ceil() };
    Ok(tick as i32)
}

/// `1.0001^tick`
pub fn tick_to_price(tick: i32) -> f64 {
    TICK_BASE.powf(tick as f64)
}

/// Exact Q96 square-root ratio at a tick
///
/// Only bits 0 through 19 of `|tick|` contribute. The input is not clamped
/// to `[MIN_TICK, MAX_TICK]`.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> U256 {
    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(SQRT_RATIO_BIT_0)
    } else {
        U256::one() << Q128_RESOLUTION
    };

    for (bit, factor) in SQRT_RATIO_FACTORS.iter().enumerate() {
        if abs_tick & (0x2 << bit) != 0 {
            // ratio <= 2^128 and factor < 2^128, so the product fits 256 bits
            ratio = (ratio * U256::from(*factor)) >> Q128_RESOLUTION;
        }
    }

    if tick > 0 {
        ratio = invert_q256(ratio);
    }

    ratio >> 32
}

/// `floor(2^256 / ratio)` without leaving 256 bits
///
/// The factor table keeps `ratio` above 2^52, so the quotient always fits.
fn invert_q256(ratio: U256) -> U256 {
    let (quotient, remainder) = U256::MAX.div_mod(ratio);
    // 2^256 = (MAX / ratio) * ratio + remainder + 1
    if remainder + U256::one() == ratio {
        quotient.saturating_add(U256::one())
    } else {
        quotient
    }
}

/// Round a tick down to a multiple of `tick_spacing`
pub fn align_tick_down(tick: i32, tick_spacing: i32) -> CoreResult<i32> {
    check_tick_spacing(tick_spacing)?;
    Ok(tick.div_euclid(tick_spacing) * tick_spacing)
}

/// Round a tick up to a multiple of `tick_spacing`
pub fn align_tick_up(tick: i32, tick_spacing: i32) -> CoreResult<i32> {
    check_tick_spacing(tick_spacing)?;
    Ok(-(-tick).div_euclid(tick_spacing) * tick_spacing)
}

fn check_tick_spacing(tick_spacing: i32) -> CoreResult<()> {
    if tick_spacing <= 0 {
        return Err(CoreError::InvalidInput(format!(
            "Tick spacing must be positive, got {}",
            tick_spacing
        )));
    }
    Ok(())
}

/// Turn a price band into an aligned tick range that covers it
///
/// The lower bound is rounded down and the upper bound up, both before and
/// after alignment, so the range is never narrower than requested.
pub fn price_range_to_ticks(
    price_lower: f64,
    price_upper: f64,
    tick_spacing: i32,
) -> CoreResult<PriceRange> {
    if !(price_lower < price_upper) {
        return Err(CoreError::InvalidInput(format!(
            "price_lower ({}) must be less than price_upper ({})",
            price_lower, price_upper
        )));
    }

    let tick_lower = align_tick_down(price_to_tick(price_lower, true)?, tick_spacing)?;
    let tick_upper = align_tick_up(price_to_tick(price_upper, false)?, tick_spacing)?;

    PriceRange::new(tick_lower, tick_upper)
}
