use std::sync::Arc;

use perpcity_core::{
    calculate_liquidity_for_target_ratio, leverage_to_margin_ratio, price_range_to_ticks,
    price_to_sqrt_price_x96, scale_to_fixed6, taker_notional, taker_open_fees, PriceRange, U256,
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    client::{execute, market::MarketService},
    config::SdkConfig,
    error::{SdkError, SdkResult},
    ledger::{encode_int, encode_uint, LedgerClient, Receipt, SubmitRequest},
};

/// How a maker sizes its liquidity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MakerLiquidity {
    /// Use this liquidity constant as is
    Explicit(u128),
    /// Size liquidity so the position holds this margin ratio
    TargetMarginRatio(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenMakerParams {
    /// Human units
    pub margin: f64,
    pub price_lower: f64,
    pub price_upper: f64,
    pub liquidity: MakerLiquidity,
    pub max_amt0_in: u128,
    pub max_amt1_in: u128,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenTakerParams {
    pub is_long: bool,
    /// Human units
    pub margin: f64,
    pub leverage: f64,
    pub unspecified_amount_limit: u128,
}

/// Slippage limits for a close, human units
#[derive(Debug, Clone, PartialEq)]
pub struct ClosePositionParams {
    pub min_amt0_out: f64,
    pub min_amt1_out: f64,
    pub max_amt1_in: f64,
}

/// New perp; module addresses fall back to the deployment config
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePerpParams {
    pub starting_price: f64,
    pub beacon: String,
    pub fees: Option<String>,
    pub margin_ratios: Option<String>,
    pub lockup_period: Option<String>,
    pub sqrt_price_impact_limit: Option<String>,
}

/// Contract arguments for `openMakerPos`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakerOpenPlan {
    pub perp_id: String,
    pub margin_scaled: i128,
    pub range: PriceRange,
    pub liquidity: u128,
    pub max_amt0_in: u128,
    pub max_amt1_in: u128,
    /// Collateral the manager must be approved to pull
    pub approval: u128,
}

/// Contract arguments for `openTakerPos`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TakerOpenPlan {
    pub perp_id: String,
    pub is_long: bool,
    pub margin_scaled: i128,
    pub margin_ratio: u64,
    pub notional: u128,
    pub total_fees: u128,
    /// Margin plus fees
    pub approval: u128,
    pub unspecified_amount_limit: u128,
}

/// Contract arguments for `closePosition`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosePlan {
    pub position_id: u64,
    pub min_amt0_out: i128,
    pub min_amt1_out: i128,
    pub max_amt1_in: i128,
}

/// Contract arguments for `createPerp`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePerpPlan {
    pub beacon: String,
    pub fees: String,
    pub margin_ratios: String,
    pub lockup_period: String,
    pub sqrt_price_impact_limit: String,
    pub sqrt_price_x96: U256,
}

/// Service for planning and submitting position changes
#[derive(Clone)]
pub struct TradeService {
    ledger: Arc<dyn LedgerClient>,
    config: Arc<SdkConfig>,
    market: MarketService,
}

impl TradeService {
    pub fn new(ledger: Arc<dyn LedgerClient>, config: Arc<SdkConfig>, market: MarketService) -> Self {
        Self {
            ledger,
            config,
            market,
        }
    }

    /// Plan a maker position over a price band
    pub async fn plan_maker_open(&self, perp_id: &str, params: &OpenMakerParams) -> SdkResult<MakerOpenPlan> {
        if !(params.margin > 0.0) {
            return Err(SdkError::InvalidParameters("Margin must be greater than 0".to_string()));
        }
        if !(params.price_lower < params.price_upper) {
            return Err(SdkError::InvalidParameters(
                "price_lower must be less than price_upper".to_string(),
            ));
        }

        let margin_scaled = scale_to_fixed6(params.margin);
        let perp = self.market.perp_data(perp_id).await?;
        let range = price_range_to_ticks(params.price_lower, params.price_upper, perp.tick_spacing)?;

        let liquidity = match params.liquidity {
            MakerLiquidity::Explicit(liquidity) => liquidity,
            // same snapshot as the tick spacing above
            MakerLiquidity::TargetMarginRatio(ratio) => calculate_liquidity_for_target_ratio(
                margin_scaled,
                range.tick_lower(),
                range.tick_upper(),
                perp.sqrt_price_x96,
                ratio,
            )?,
        };

        debug!(
            "Maker plan on {}: margin {} ticks [{}, {}] liquidity {}",
            perp_id,
            margin_scaled,
            range.tick_lower(),
            range.tick_upper(),
            liquidity
        );

        Ok(MakerOpenPlan {
            perp_id: perp_id.to_string(),
            margin_scaled,
            range,
            liquidity,
            max_amt0_in: params.max_amt0_in,
            max_amt1_in: params.max_amt1_in,
            approval: margin_scaled.unsigned_abs(),
        })
    }

    /// Plan a taker position at a target leverage
    pub async fn plan_taker_open(&self, perp_id: &str, params: &OpenTakerParams) -> SdkResult<TakerOpenPlan> {
        if !(params.margin > 0.0) {
            return Err(SdkError::InvalidParameters("Margin must be greater than 0".to_string()));
        }
        if !(params.leverage > 0.0) {
            return Err(SdkError::InvalidParameters("Leverage must be greater than 0".to_string()));
        }

        let margin_scaled = scale_to_fixed6(params.margin);
        let margin_ratio = leverage_to_margin_ratio(params.leverage)?;

        let (perp, protocol_fee_rate) =
            tokio::try_join!(self.market.perp_data(perp_id), self.market.protocol_fee_rate())?;

        if !perp.bounds.allows_leverage(params.leverage) {
            warn!(
                "Leverage {} on {} is outside [{}, {}]",
                params.leverage, perp_id, perp.bounds.min_taker_leverage, perp.bounds.max_taker_leverage
            );
        }

        let notional = taker_notional(margin_scaled, margin_ratio)?;
        let total_fees = taker_open_fees(notional, &perp.fees, protocol_fee_rate);
        let approval = margin_scaled
            .unsigned_abs()
            .checked_add(total_fees)
            .ok_or_else(|| SdkError::InvalidParameters(format!("Approval overflows for margin {}", margin_scaled)))?;

        debug!(
            "Taker plan on {}: margin {} ratio {} notional {} fees {}",
            perp_id, margin_scaled, margin_ratio, notional, total_fees
        );

        Ok(TakerOpenPlan {
            perp_id: perp_id.to_string(),
            is_long: params.is_long,
            margin_scaled,
            margin_ratio,
            notional,
            total_fees,
            approval,
            unspecified_amount_limit: params.unspecified_amount_limit,
        })
    }

    /// Scale close limits to contract units
    pub fn plan_close(&self, position_id: u64, params: &ClosePositionParams) -> ClosePlan {
        ClosePlan {
            position_id,
            min_amt0_out: scale_to_fixed6(params.min_amt0_out),
            min_amt1_out: scale_to_fixed6(params.min_amt1_out),
            max_amt1_in: scale_to_fixed6(params.max_amt1_in),
        }
    }

    /// Resolve module addresses and the starting sqrt price
    pub fn plan_create_perp(&self, params: &CreatePerpParams) -> SdkResult<CreatePerpPlan> {
        let sqrt_price_x96 = price_to_sqrt_price_x96(params.starting_price)?;
        let modules = &self.config.modules;

        let resolve = |explicit: &Option<String>, fallback: &Option<String>| {
            explicit.clone().or_else(|| fallback.clone())
        };

        match (
            resolve(&params.fees, &modules.fees),
            resolve(&params.margin_ratios, &modules.margin_ratios),
            resolve(&params.lockup_period, &modules.lockup_period),
            resolve(&params.sqrt_price_impact_limit, &modules.sqrt_price_impact_limit),
        ) {
            (Some(fees), Some(margin_ratios), Some(lockup_period), Some(sqrt_price_impact_limit)) => {
                Ok(CreatePerpPlan {
                    beacon: params.beacon.clone(),
                    fees,
                    margin_ratios,
                    lockup_period,
                    sqrt_price_impact_limit,
                    sqrt_price_x96,
                })
            }
            _ => Err(SdkError::Config(
                "Module addresses must be provided either in params or deployment config".to_string(),
            )),
        }
    }

    pub async fn submit_maker_open(&self, plan: &MakerOpenPlan, holder: &str) -> SdkResult<Receipt> {
        let request = self.request(
            "openMakerPos",
            vec![
                json!(plan.perp_id),
                json!({
                    "holder": holder,
                    "margin": encode_int(plan.margin_scaled),
                    "liquidity": encode_uint(plan.liquidity),
                    "tickLower": plan.range.tick_lower(),
                    "tickUpper": plan.range.tick_upper(),
                    "maxAmt0In": encode_uint(plan.max_amt0_in),
                    "maxAmt1In": encode_uint(plan.max_amt1_in),
                }),
            ],
            None,
        );
        self.submit(request, &plan.perp_id).await
    }

    pub async fn submit_taker_open(&self, plan: &TakerOpenPlan, holder: &str) -> SdkResult<Receipt> {
        let request = self.request(
            "openTakerPos",
            vec![
                json!(plan.perp_id),
                json!({
                    "holder": holder,
                    "isLong": plan.is_long,
                    "margin": encode_int(plan.margin_scaled),
                    "marginRatio": encode_uint(plan.margin_ratio),
                    "unspecifiedAmountLimit": encode_uint(plan.unspecified_amount_limit),
                }),
            ],
            None,
        );
        self.submit(request, &plan.perp_id).await
    }

    pub async fn submit_close(&self, plan: &ClosePlan) -> SdkResult<Receipt> {
        let request = self.request(
            "closePosition",
            vec![json!({
                "posId": encode_uint(plan.position_id),
                "minAmt0Out": encode_int(plan.min_amt0_out),
                "minAmt1Out": encode_int(plan.min_amt1_out),
                "maxAmt1In": encode_int(plan.max_amt1_in),
            })],
            Some(self.config.close_gas_limit),
        );
        self.submit(request, &format!("position {}", plan.position_id)).await
    }

    pub async fn submit_create_perp(&self, plan: &CreatePerpPlan) -> SdkResult<Receipt> {
        let request = self.request(
            "createPerp",
            vec![json!([
                plan.beacon,
                plan.fees,
                plan.margin_ratios,
                plan.lockup_period,
                plan.sqrt_price_impact_limit,
                encode_uint(plan.sqrt_price_x96),
            ])],
            None,
        );
        self.submit(request, &plan.beacon).await
    }

    fn request(&self, function: &str, args: Vec<serde_json::Value>, gas: Option<u64>) -> SubmitRequest {
        SubmitRequest {
            contract: self.config.perp_manager.clone(),
            function: function.to_string(),
            args,
            gas,
        }
    }

    async fn submit(&self, request: SubmitRequest, target: &str) -> SdkResult<Receipt> {
        let function = request.function.clone();
        let receipt = execute(self.ledger.as_ref(), request).await?;
        info!("Submitted {} for {}: {}", function, target, receipt.tx_id);
        Ok(receipt)
    }
}
