//! # Fixed-Point Scaling
//!
//! Conversions between human decimal amounts and the two encodings the perp
//! manager uses on-chain: 6-decimal integers and Q96 integers.
//!
//! Rounding is always `floor`, toward negative infinity, including for
//! negative amounts: `scale_to_fixed6(-0.0000005) == -1`, never `0`. The
//! contract rounds the same way, so truncation toward zero would drift by one
//! unit on every short position.

use primitive_types::U256;

use crate::constants::{NUMBER_1E6, NUMBER_1E6_F64, Q96_RESOLUTION};
use crate::math::big_int::{q96, u256_to_f64};

/// A signed Q96 amount: sign plus 256-bit magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub struct X96Amount {
    pub negative: bool,
    pub magnitude: U256,
}

impl X96Amount {
    /// Build a value, normalising `-0` to `0`
    pub fn new(negative: bool, magnitude: U256) -> Self {
        Self {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    pub fn positive(magnitude: U256) -> Self {
        Self::new(false, magnitude)
    }

    pub fn negative(magnitude: U256) -> Self {
        Self::new(true, magnitude)
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }
}

impl From<U256> for X96Amount {
    fn from(magnitude: U256) -> Self {
        Self::positive(magnitude)
    }
}

/// `floor(amount * 10^6)`
///
/// Non-finite input saturates the way an `f64 -> i128` cast does.
pub fn scale_to_fixed6(amount: f64) -> i128 {
    (amount * NUMBER_1E6_F64).floor() as i128
}

/// `value / 10^6`
pub fn scale_from_fixed6(value: i128) -> f64 {
    value as f64 / NUMBER_1E6_F64
}

/// `floor(scale_to_fixed6(amount) * 2^96 / 10^6)`
pub fn scale_to_q96(amount: f64) -> X96Amount {
    let scaled = scale_to_fixed6(amount);
    // |scaled| < 2^128, so the shifted numerator stays below 2^224
    let numerator = U256::from(scaled.unsigned_abs()) << Q96_RESOLUTION;
    let (quotient, remainder) = numerator.div_mod(U256::from(NUMBER_1E6 as u128));

    // floor of a negative quotient is the negated ceiling of its magnitude
    let magnitude = if scaled < 0 && !remainder.is_zero() {
        quotient + U256::one()
    } else {
        quotient
    };

    X96Amount::new(scaled < 0, magnitude)
}

/// `floor(value * 10^6 / 2^96) / 10^6`
///
/// The inner step is split at the Q96 boundary so the product never needs
/// more than 256 bits: `floor((q * 2^96 + r) * 10^6 / 2^96) = q * 10^6 +
/// floor(r * 10^6 / 2^96)` for `0 <= r < 2^96`.
pub fn scale_from_q96(value: X96Amount) -> f64 {
    let one_e6 = U256::from(NUMBER_1E6 as u128);
    let fraction_mask = q96() - U256::one();

    let whole = value.magnitude >> Q96_RESOLUTION;
    let remainder = value.magnitude & fraction_mask;

    let scaled = if value.negative {
        // floor(-x) = -ceil(x)
        let fraction = (remainder * one_e6 + fraction_mask) >> Q96_RESOLUTION;
        -(u256_to_f64(whole * one_e6 + fraction))
    } else {
        let fraction = (remainder * one_e6) >> Q96_RESOLUTION;
        u256_to_f64(whole * one_e6 + fraction)
    };

    scaled / NUMBER_1E6_F64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_to_fixed6() {
        assert_eq!(scale_to_fixed6(100.0), 100_000_000);
        assert_eq!(scale_to_fixed6(100.5), 100_500_000);
        assert_eq!(scale_to_fixed6(0.0), 0);
        assert_eq!(scale_to_fixed6(0.000001), 1);
        assert_eq!(scale_to_fixed6(100.5555555), 100_555_555);
        assert_eq!(scale_to_fixed6(-100.0), -100_000_000);
    }

    #[test]
    fn test_negative_amounts_floor_toward_negative_infinity() {
        assert_eq!(scale_to_fixed6(-0.0000005), -1);
        assert_eq!(scale_to_fixed6(-100.5555555), -100_555_556);
    }

    #[test]
    fn test_scale_from_fixed6() {
        assert_eq!(scale_from_fixed6(100_000_000), 100.0);
        assert_eq!(scale_from_fixed6(500_000), 0.5);
        assert_eq!(scale_from_fixed6(1), 0.000001);
        assert_eq!(scale_from_fixed6(-100_000_000), -100.0);
        assert_eq!(scale_from_fixed6(scale_to_fixed6(100.0)), 100.0);
    }

    #[test]
    fn test_scale_to_q96() {
        assert_eq!(scale_to_q96(1.0), X96Amount::positive(q96()));
        assert_eq!(scale_to_q96(100.0), X96Amount::positive(q96() * U256::from(100u8)));

        let half = scale_to_q96(0.5);
        assert!(!half.negative);
        assert!(half.magnitude < q96() && !half.magnitude.is_zero());
    }

    #[test]
    fn test_scale_to_q96_negative_floor() {
        // -1 * 2^96 / 10^6 = -79228162514264337593543.95..., floored
        let value = scale_to_q96(-0.0000005);
        assert!(value.negative);
        assert_eq!(value.magnitude, U256::from(79_228_162_514_264_337_593_544u128));

        assert_eq!(scale_to_q96(-0.5), X96Amount::negative(q96() >> 1));
    }

    #[test]
    fn test_scale_from_q96() {
        assert_eq!(scale_from_q96(X96Amount::positive(q96() * U256::from(100u8))), 100.0);
        assert_eq!(scale_from_q96(X96Amount::positive(q96())), 1.0);
        assert!((scale_from_q96(X96Amount::positive(q96() >> 1)) - 0.5).abs() < 1e-5);
        assert_eq!(scale_from_q96(X96Amount::default()), 0.0);
    }

    #[test]
    fn test_scale_from_q96_negative_floor() {
        assert_eq!(scale_from_q96(X96Amount::negative(q96() >> 1)), -0.5);
        // the smallest negative value floors to a whole -1e-6
        assert_eq!(scale_from_q96(X96Amount::negative(U256::one())), -0.000001);
    }

    #[test]
    fn test_negative_zero_is_normalised() {
        assert_eq!(X96Amount::negative(U256::zero()), X96Amount::default());
    }
}
