use std::sync::Arc;

use perpcity_core::{
    position_metrics, scale_from_fixed6, LiveDetails, MarginRatioBounds, PositionMetrics,
    RawPositionState,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    client::{market::MarketService, view},
    config::SdkConfig,
    error::{SdkError, SdkResult},
    ledger::{decode_bool, decode_i128, decode_string, decode_u64, encode_uint, tuple_field, LedgerClient},
};

/// Raw position state together with its identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub perp_id: String,
    pub position_id: u64,
    pub state: RawPositionState,
}

/// Service for position reads and risk views
#[derive(Clone)]
pub struct PositionService {
    ledger: Arc<dyn LedgerClient>,
    config: Arc<SdkConfig>,
    market: MarketService,
}

impl PositionService {
    pub fn new(ledger: Arc<dyn LedgerClient>, config: Arc<SdkConfig>, market: MarketService) -> Self {
        Self {
            ledger,
            config,
            market,
        }
    }

    /// Stored state of a position
    pub async fn raw_position(&self, position_id: u64) -> SdkResult<PositionSnapshot> {
        let operation = format!("raw_position for position {}", position_id);
        let result = view(
            self.ledger.as_ref(),
            &self.config.perp_manager,
            "positions",
            vec![encode_uint(position_id)],
        )
        .await
        .map_err(|e| e.in_operation(&operation))?;

        let perp_id = decode_string(tuple_field(&result, 0, "perpId")?, "perpId")?;
        if is_zero_id(&perp_id) {
            return Err(SdkError::NotFound(format!("Position {} does not exist", position_id)));
        }

        let ratios = tuple_field(&result, 7, "marginRatios")?;
        let margin_ratio_bounds = MarginRatioBounds {
            min: decode_u64(tuple_field(ratios, 0, "min")?, "min")?,
            max: decode_u64(tuple_field(ratios, 1, "max")?, "max")?,
            liquidation: decode_u64(tuple_field(ratios, 2, "liq")?, "liq")?,
        };

        Ok(PositionSnapshot {
            perp_id,
            position_id,
            state: RawPositionState {
                margin: decode_i128(tuple_field(&result, 1, "margin")?, "margin")?,
                entry_base_delta: decode_i128(tuple_field(&result, 2, "entryPerpDelta")?, "entryPerpDelta")?,
                entry_quote_delta: decode_i128(tuple_field(&result, 3, "entryUsdDelta")?, "entryUsdDelta")?,
                margin_ratio_bounds,
            },
        })
    }

    /// Close quote of a live position
    pub async fn live_details(&self, position_id: u64) -> SdkResult<LiveDetails> {
        let operation = format!("live_details for position {}", position_id);
        let result = view(
            self.ledger.as_ref(),
            &self.config.perp_manager,
            "quoteClosePosition",
            vec![encode_uint(position_id)],
        )
        .await
        .map_err(|e| e.in_operation(&operation))?;

        let reason = tuple_field(&result, 0, "unexpectedReason")?;
        if !is_empty_reason(reason) {
            warn!("Close quote for position {} failed: {}", position_id, reason);
            return Err(SdkError::NotFound(format!(
                "Failed to quote position {} - position may be invalid or already closed",
                position_id
            )));
        }

        let scaled = |index: usize, field: &str| -> SdkResult<f64> {
            Ok(scale_from_fixed6(decode_i128(tuple_field(&result, index, field)?, field)?))
        };

        Ok(LiveDetails {
            pnl: scaled(1, "pnl")?,
            funding_payment: scaled(2, "funding")?,
            effective_margin: scaled(3, "netMargin")?,
            is_liquidatable: decode_bool(tuple_field(&result, 4, "wasLiquidated")?, "wasLiquidated")?,
        })
    }

    /// Risk metrics of a position at the perp's current mark
    pub async fn position_view(&self, position_id: u64, is_long: bool) -> SdkResult<PositionMetrics> {
        let snapshot = self.raw_position(position_id).await?;
        let (perp, live) = tokio::try_join!(
            self.market.perp_data(&snapshot.perp_id),
            self.live_details(position_id),
        )?;

        let metrics = position_metrics(&snapshot.state, perp.mark, live.effective_margin, is_long);
        debug!(
            "Position {} on {}: value {} leverage {} liquidation {:?}",
            position_id, snapshot.perp_id, metrics.value, metrics.leverage, metrics.liquidation_price
        );
        Ok(metrics)
    }
}

fn is_zero_id(id: &str) -> bool {
    let digits = id.strip_prefix("0x").unwrap_or(id);
    digits.chars().all(|c| c == '0')
}

fn is_empty_reason(reason: &Value) -> bool {
    match reason {
        Value::Null => true,
        Value::String(text) => text.is_empty() || text == "0x",
        Value::Array(bytes) => bytes.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_id_detection() {
        assert!(is_zero_id(&format!("0x{}", "0".repeat(64))));
        assert!(!is_zero_id("0x01"));
    }

    #[test]
    fn test_empty_reason_forms() {
        assert!(is_empty_reason(&json!("")));
        assert!(is_empty_reason(&json!("0x")));
        assert!(is_empty_reason(&json!([])));
        assert!(!is_empty_reason(&json!("0x08c379a0")));
    }
}
