//! # PerpCity Core - Pricing and Risk Math
//!
//! Pure computation shared by every PerpCity client. It mirrors, off-chain,
//! the integer arithmetic the perp manager contract performs:
//!
//! - Fixed-point scaling between human amounts, 10^6 integers and Q96 values
//! - Price / tick / sqrt-price conversions, including the bit-decomposition
//!   `get_sqrt_ratio_at_tick`
//! - Liquidity sizing for a tick range
//! - Position risk metrics (entry price, notional, leverage, liquidation price)
//!
//! Nothing in this crate performs I/O or holds state between calls.
//!
//! ## Feature Flags
//!
//! - `client`: Enables serde derives on the shared types

pub mod constants;
pub mod errors;
pub mod math;
pub mod risk;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use errors::{CoreError, CoreResult, ErrorKind};
pub use math::*;
pub use primitive_types::U256;
pub use risk::*;
pub use types::*;
