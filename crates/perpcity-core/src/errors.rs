//! # Core Error Types
//!
//! Every failure in the core is either a caller mistake (`InvalidInput`) or a
//! mathematically degenerate request (`ArithmeticError`). Neither is transient,
//! so nothing here is ever worth retrying. Messages carry the offending values.

use thiserror::Error;

/// Core errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum CoreError {
    /// Non-positive price, inverted or degenerate tick range, non-positive ratio
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Division by zero or a non-positive computed quantity
    #[error("Arithmetic error: {0}")]
    ArithmeticError(String),
}

/// Coarse classification of a [`CoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Arithmetic,
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::ArithmeticError(_) => ErrorKind::Arithmetic,
        }
    }

    /// Price must be strictly positive and finite
    pub fn non_positive_price(price: f64) -> Self {
        Self::InvalidInput(format!("Price must be positive, got {}", price))
    }

    /// Tick range with `tick_lower >= tick_upper`
    pub fn invalid_tick_range(tick_lower: i32, tick_upper: i32) -> Self {
        Self::InvalidInput(format!(
            "Invalid tick range: tick_lower ({}) must be less than tick_upper ({})",
            tick_lower, tick_upper
        ))
    }

    /// Intermediate or final value does not fit its integer width
    pub fn overflow(operation: &str, detail: impl std::fmt::Display) -> Self {
        Self::ArithmeticError(format!("Overflow in {}: {}", operation, detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_range_message_names_both_ticks() {
        let err = CoreError::invalid_tick_range(1000, -1000);
        assert_eq!(
            err.to_string(),
            "Invalid input: Invalid tick range: tick_lower (1000) must be less than tick_upper (-1000)"
        );
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_overflow_kind() {
        let err = CoreError::overflow("estimate_liquidity", "result exceeds u128");
        assert_eq!(err.kind(), ErrorKind::Arithmetic);
        assert!(err.to_string().contains("estimate_liquidity"));
    }
}
