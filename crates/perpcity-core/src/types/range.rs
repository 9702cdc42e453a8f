//! # Tick Ranges

use crate::errors::{CoreError, CoreResult};

/// A tick range with `tick_lower < tick_upper`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(serde::Serialize))]
pub struct PriceRange {
    tick_lower: i32,
    tick_upper: i32,
}

impl PriceRange {
    /// Validated constructor; equal or inverted bounds are rejected
    pub fn new(tick_lower: i32, tick_upper: i32) -> CoreResult<Self> {
        if tick_lower >= tick_upper {
            return Err(CoreError::invalid_tick_range(tick_lower, tick_upper));
        }
        Ok(Self { tick_lower, tick_upper })
    }

    pub fn tick_lower(&self) -> i32 {
        self.tick_lower
    }

    pub fn tick_upper(&self) -> i32 {
        self.tick_upper
    }

    /// Number of ticks covered
    pub fn width(&self) -> u32 {
        self.tick_upper.abs_diff(self.tick_lower)
    }

    /// Whether `tick` lies in `[tick_lower, tick_upper)`
    pub fn contains(&self, tick: i32) -> bool {
        tick >= self.tick_lower && tick < self.tick_upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_ordering_enforced() {
        assert!(PriceRange::new(-60, 60).is_ok());
        assert!(PriceRange::new(60, 60).is_err());
        assert!(PriceRange::new(60, -60).is_err());
    }

    #[test]
    fn test_range_queries() {
        let range = PriceRange::new(-120, 60).unwrap();
        assert_eq!(range.width(), 180);
        assert!(range.contains(-120));
        assert!(range.contains(0));
        assert!(!range.contains(60));
    }
}
