//! # Protocol Constants
//!
//! Scale factors and tick bounds used by the perp manager contract.

// ============================================================================
// Fixed-Point Scales
// ============================================================================

/// Token amount scale: every on-chain amount carries 6 decimals
pub const NUMBER_1E6: i128 = 1_000_000;

/// `NUMBER_1E6` as a float, for human-unit conversions
pub const NUMBER_1E6_F64: f64 = 1_000_000.0;

/// Bit width of the Q96 fractional part
pub const Q96_RESOLUTION: u32 = 96;

/// Bit width of the Q128 accumulator used by the tick ratio table
pub const Q128_RESOLUTION: u32 = 128;

/// Q96 as a plain integer (2^96 fits in a u128)
pub const Q96_U128: u128 = 1u128 << Q96_RESOLUTION;

// ============================================================================
// Tick Bounds
// ============================================================================

/// Per-tick price ratio
pub const TICK_BASE: f64 = 1.0001;

/// Minimum tick the underlying pool accepts
pub const MIN_TICK: i32 = -887_272;

/// Maximum tick the underlying pool accepts
pub const MAX_TICK: i32 = 887_272;

// ============================================================================
// Market Defaults
// ============================================================================

/// Minimum margin (human units) a taker must post
pub const DEFAULT_MIN_MARGIN: f64 = 10.0;
