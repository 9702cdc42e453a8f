//! # Risk Calculations
//!
//! Position risk metrics and leverage / margin-ratio conversions.

pub mod leverage;
pub mod position;

pub use leverage::*;
pub use position::*;
