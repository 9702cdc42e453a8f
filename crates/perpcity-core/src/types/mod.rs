//! # Core Type Definitions
//!
//! Value types shared by the core math and the SDK services.

pub mod market;
pub mod state;
pub mod range;

// Re-export all types
pub use market::*;
pub use state::*;
pub use range::*;
