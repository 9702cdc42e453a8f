//! # Mathematical Functions
//!
//! Fixed-point scaling, tick conversions and liquidity sizing.

pub mod big_int;
pub mod fixed_point;
pub mod liquidity_math;
pub mod tick_math;

// Re-export commonly used functions
pub use big_int::*;
pub use fixed_point::*;
pub use liquidity_math::*;
pub use tick_math::*;
