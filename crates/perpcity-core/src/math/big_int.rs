//! Wide integer helpers for Q96/Q128 fixed-point arithmetic
//!
//! Thin layer over `primitive_types::{U256, U512}`. Products of two 256-bit
//! values go through a 512-bit intermediate so that every `floor(a * b / c)`
//! matches the unbounded integer result exactly.

use primitive_types::{U256, U512};

use crate::constants::{Q128_RESOLUTION, Q96_RESOLUTION};
use crate::errors::{CoreError, CoreResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Round towards negative infinity
    Down,
    /// Round towards positive infinity
    Up,
}

/// 2^96
pub fn q96() -> U256 {
    U256::one() << Q96_RESOLUTION
}

/// 2^128
pub fn q128() -> U256 {
    U256::one() << Q128_RESOLUTION
}

/// Narrow a 512-bit value back to 256 bits
pub fn narrow_u512(value: U512, operation: &str) -> CoreResult<U256> {
    U256::try_from(value).map_err(|_| CoreError::overflow(operation, "result exceeds 256 bits"))
}

/// Narrow a 256-bit value to u128
pub fn narrow_u256(value: U256, operation: &str) -> CoreResult<u128> {
    if value.bits() > 128 {
        return Err(CoreError::overflow(
            operation,
            format!("{} exceeds 128 bits", value),
        ));
    }
    Ok(value.low_u128())
}

/// `(a * b) >> shift` with a 512-bit intermediate
pub fn mul_shr(a: U256, b: U256, shift: u32, operation: &str) -> CoreResult<U256> {
    narrow_u512(a.full_mul(b) >> shift as usize, operation)
}

/// `(a * b) / denominator` with the requested rounding
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> CoreResult<U256> {
    if denominator.is_zero() {
        return Err(CoreError::ArithmeticError(format!(
            "Division by zero in mul_div({}, {}, 0)",
            a, b
        )));
    }

    let product = a.full_mul(b);
    let denominator = U512::from(denominator);
    let mut quotient = product / denominator;

    if rounding == Rounding::Up && !(product % denominator).is_zero() {
        quotient = quotient + U512::one();
    }

    narrow_u512(quotient, "mul_div")
}

/// `floor(value)` of a non-negative float, exact for every representable input
///
/// `None` for negative or non-finite values and for values of 2^256 or more.
pub fn f64_to_u256(value: f64) -> Option<U256> {
    if !(value >= 0.0) || !value.is_finite() {
        return None;
    }

    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    if exponent == 0 {
        // zero or subnormal
        return Some(U256::zero());
    }

    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    let shift = exponent - 1075;

    if shift >= 0 {
        // 53 significant bits must stay below bit 256
        if shift > 203 {
            return None;
        }
        Some(U256::from(mantissa) << shift as usize)
    } else if shift <= -53 {
        Some(U256::zero())
    } else {
        Some(U256::from(mantissa >> (-shift) as u32))
    }
}

/// Lossy conversion to f64
pub fn u256_to_f64(value: U256) -> f64 {
    if value.bits() <= 128 {
        return value.low_u128() as f64;
    }
    value
        .0
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
}
