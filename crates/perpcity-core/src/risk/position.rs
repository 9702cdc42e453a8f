//! # Position Risk
//!
//! Entry price, size, value, leverage and liquidation price of a position,
//! derived from its raw on-chain state. All outputs are in human units.
//!
//! A non-positive effective margin is a valid, already critical state: it
//! yields infinite leverage rather than an error, so risk views can sort
//! such positions above every finite one.

use crate::constants::NUMBER_1E6_F64;
use crate::types::{PositionMetrics, RawPositionState};

/// `|quote delta| / |base delta|`, or 0 for a flat position
pub fn entry_price(state: &RawPositionState) -> f64 {
    if state.entry_base_delta == 0 {
        return 0.0;
    }
    state.entry_quote_delta.unsigned_abs() as f64 / state.entry_base_delta.unsigned_abs() as f64
}

/// Signed base size; negative for shorts
pub fn position_size(state: &RawPositionState) -> f64 {
    state.entry_base_delta as f64 / NUMBER_1E6_F64
}

/// Notional at `mark_price`
pub fn position_value(state: &RawPositionState, mark_price: f64) -> f64 {
    position_size(state).abs() * mark_price
}

/// `position_value / effective_margin`, infinite once margin is gone
pub fn leverage(position_value: f64, effective_margin: f64) -> f64 {
    if effective_margin <= 0.0 {
        return f64::INFINITY;
    }
    position_value / effective_margin
}

/// Mark price at which the position's margin drops to the liquidation ratio
///
/// `None` for a flat position or one with no margin left. A long's price is
/// floored at 0; a short's is unbounded above.
pub fn liquidation_price(state: &RawPositionState, is_long: bool) -> Option<f64> {
    let entry = entry_price(state);
    let size = position_size(state).abs();

    if size == 0.0 || state.margin <= 0 {
        return None;
    }

    let liquidation_ratio = state.margin_ratio_bounds.liquidation_fraction();
    let entry_notional = size * entry;
    let margin_excess = state.margin_human() - liquidation_ratio * entry_notional;

    if is_long {
        Some((entry - margin_excess / size).max(0.0))
    } else {
        Some(entry + margin_excess / size)
    }
}

/// All risk metrics of a position at one mark
pub fn position_metrics(
    state: &RawPositionState,
    mark_price: f64,
    effective_margin: f64,
    is_long: bool,
) -> PositionMetrics {
    let value = position_value(state, mark_price);
    PositionMetrics {
        entry_price: entry_price(state),
        size: position_size(state),
        value,
        leverage: leverage(value, effective_margin),
        liquidation_price: liquidation_price(state, is_long),
    }
}
