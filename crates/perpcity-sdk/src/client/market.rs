use std::sync::Arc;

use perpcity_core::{
    scale_from_fixed6, sqrt_price_x96_to_price, Fees, MarginRatioBounds, MarketBounds, PerpConfig,
    PerpData, PoolKey, DEFAULT_MIN_MARGIN, U256,
};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    client::view,
    config::SdkConfig,
    error::{SdkError, SdkResult},
    ledger::{decode_i32, decode_string, decode_u256, decode_u64, tuple_field, LedgerClient},
};

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// TWAP window, in seconds, used for the mark price
const MARK_TWAP_SECONDS: u64 = 1;

/// Service for market reads
#[derive(Clone)]
pub struct MarketService {
    ledger: Arc<dyn LedgerClient>,
    config: Arc<SdkConfig>,
}

impl MarketService {
    pub fn new(ledger: Arc<dyn LedgerClient>, config: Arc<SdkConfig>) -> Self {
        Self { ledger, config }
    }

    /// Fail unless the endpoint serves the configured chain
    pub async fn validate_chain_id(&self) -> SdkResult<()> {
        let rpc_chain_id = self.ledger.chain_id().await?;
        if rpc_chain_id != self.config.chain_id {
            return Err(SdkError::Config(format!(
                "RPC chain mismatch. RPC returned chain ID {}, but expected chain ID {}. \
                 Ensure rpc_url corresponds to the correct network.",
                rpc_chain_id, self.config.chain_id
            )));
        }
        Ok(())
    }

    /// Pool key and module addresses of a perp
    pub async fn perp_config(&self, perp_id: &str) -> SdkResult<PerpConfig> {
        let result = view(
            self.ledger.as_ref(),
            &self.config.perp_manager,
            "cfgs",
            vec![json!(perp_id)],
        )
        .await
        .map_err(|e| e.in_operation(&format!("perp_config for perp {}", perp_id)))?;

        let key = match result.get(0) {
            Some(Value::Array(fields)) if fields.len() >= 5 => decode_pool_key(fields)?,
            _ => return Err(not_found(perp_id)),
        };

        if key.tick_spacing == 0 || key.currency0.eq_ignore_ascii_case(ZERO_ADDRESS) {
            warn!("Perp {} returned an empty pool key", perp_id);
            return Err(not_found(perp_id));
        }

        let address = |index: usize, field: &str| -> SdkResult<String> {
            decode_string(tuple_field(&result, index, field)?, field)
        };

        Ok(PerpConfig {
            key,
            creator: address(1, "creator")?,
            vault: address(2, "vault")?,
            beacon: address(3, "beacon")?,
            fees: address(4, "fees")?,
            margin_ratios: address(5, "marginRatios")?,
            lockup_period: address(6, "lockupPeriod")?,
            sqrt_price_impact_limit: address(7, "sqrtPriceImpactLimit")?,
        })
    }

    /// Time-weighted average sqrt price over the mark window
    pub async fn twap_sqrt_price_x96(&self, perp_id: &str) -> SdkResult<U256> {
        let result = view(
            self.ledger.as_ref(),
            &self.config.perp_manager,
            "timeWeightedAvgSqrtPriceX96",
            vec![json!(perp_id), json!(MARK_TWAP_SECONDS)],
        )
        .await?;
        decode_u256(&result, "sqrtPriceX96")
    }

    /// Taker margin ratios from a perp's margin-ratios module
    pub async fn taker_margin_ratios(&self, config: &PerpConfig) -> SdkResult<MarginRatioBounds> {
        let contract = config.margin_ratios.as_str();
        let (min, max, liquidation) = tokio::try_join!(
            self.constant(contract, "MIN_TAKER_RATIO"),
            self.constant(contract, "MAX_TAKER_RATIO"),
            self.constant(contract, "LIQUIDATION_TAKER_RATIO"),
        )?;
        Ok(MarginRatioBounds { min, max, liquidation })
    }

    /// Fee schedule from a perp's fees module
    pub async fn fees(&self, config: &PerpConfig) -> SdkResult<Fees> {
        let contract = config.fees.as_str();
        let (creator, insurance, lp, liquidation) = tokio::try_join!(
            self.constant(contract, "CREATOR_FEE"),
            self.constant(contract, "INSURANCE_FEE"),
            self.constant(contract, "LP_FEE"),
            self.constant(contract, "LIQUIDATION_FEE"),
        )?;
        Ok(Fees::from_scaled(creator, insurance, lp, liquidation))
    }

    /// Protocol fee as a fraction of notional
    pub async fn protocol_fee_rate(&self) -> SdkResult<f64> {
        let raw = self.constant(&self.config.perp_manager, "protocolFee").await?;
        Ok(scale_from_fixed6(raw as i128))
    }

    /// Market snapshot: spacing, mark, bounds and fees
    pub async fn perp_data(&self, perp_id: &str) -> SdkResult<PerpData> {
        let operation = format!("perp_data for perp {}", perp_id);
        let config = self.perp_config(perp_id).await?;

        let (sqrt_price_x96, ratios, fees) = tokio::try_join!(
            self.twap_sqrt_price_x96(perp_id),
            self.taker_margin_ratios(&config),
            self.fees(&config),
        )
        .map_err(|e| e.in_operation(&operation))?;

        let mark = sqrt_price_x96_to_price(sqrt_price_x96)?;
        let bounds = MarketBounds::from_margin_ratios(&ratios, DEFAULT_MIN_MARGIN)?;

        debug!(
            "Perp {}: mark {} from sqrt price {}, tick spacing {}",
            perp_id, mark, sqrt_price_x96, config.key.tick_spacing
        );

        Ok(PerpData {
            id: perp_id.to_string(),
            tick_spacing: config.key.tick_spacing,
            sqrt_price_x96,
            mark,
            beacon: config.beacon,
            bounds,
            fees,
        })
    }

    async fn constant(&self, contract: &str, function: &str) -> SdkResult<u64> {
        let value = view(self.ledger.as_ref(), contract, function, Vec::new()).await?;
        decode_u64(&value, function)
    }
}

fn decode_pool_key(fields: &[Value]) -> SdkResult<PoolKey> {
    let fee = decode_u64(&fields[2], "fee")?;
    Ok(PoolKey {
        currency0: decode_string(&fields[0], "currency0")?,
        currency1: decode_string(&fields[1], "currency1")?,
        fee: u32::try_from(fee).map_err(|_| SdkError::Decode(format!("fee exceeds 32 bits: {}", fee)))?,
        tick_spacing: decode_i32(&fields[3], "tickSpacing")?,
        hooks: decode_string(&fields[4], "hooks")?,
    })
}

fn not_found(perp_id: &str) -> SdkError {
    SdkError::NotFound(format!("Perp ID {} not found or invalid", perp_id))
}
