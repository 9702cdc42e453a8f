//! Testing utilities for PerpCity clients
//!
//! [`MockLedger`] is an in-memory [`LedgerClient`] with canned view results
//! and a record of every submitted transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::{
    error::{SdkError, SdkResult},
    ledger::{encode_uint, CallRequest, LedgerClient, Receipt, SubmitRequest},
};

/// In-memory ledger for tests and offline demos
pub struct MockLedger {
    chain_id: u64,
    responses: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<CallRequest>>,
    submissions: Mutex<Vec<SubmitRequest>>,
    revert_submissions: bool,
}

impl MockLedger {
    /// Create an empty ledger on `chain_id`
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            responses: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            revert_submissions: false,
        }
    }

    /// Every submission returns a reverted receipt
    pub fn reverting(mut self) -> Self {
        self.revert_submissions = true;
        self
    }

    /// Answer `contract.function(...)` with `value` regardless of arguments
    pub async fn respond(&self, contract: &str, function: &str, value: Value) {
        self.responses.lock().await.insert(key(contract, function), value);
    }

    /// Fail `contract.function(...)` with a remote error
    pub async fn fail(&self, contract: &str, function: &str, message: &str) {
        self.failures
            .lock()
            .await
            .insert(key(contract, function), message.to_string());
    }

    /// View calls issued so far
    pub async fn calls(&self) -> Vec<CallRequest> {
        self.calls.lock().await.clone()
    }

    /// Transactions submitted so far
    pub async fn submissions(&self) -> Vec<SubmitRequest> {
        self.submissions.lock().await.clone()
    }

    /// Install a perp with the given pool and module contracts
    ///
    /// Margin ratios are 10x..2x taker leverage with a 5% liquidation ratio;
    /// fees are 0.1% creator, 0.05% insurance, 0.25% lp, 1% liquidation and a
    /// 0.1% protocol fee.
    pub async fn install_perp(&self, perp_manager: &str, perp: &MockPerp) {
        self.respond(
            perp_manager,
            "cfgs",
            json!([
                [perp.currency0, perp.currency1, 3000, perp.tick_spacing, perp.hooks],
                perp.creator,
                perp.vault,
                perp.beacon,
                perp.fees,
                perp.margin_ratios,
                perp.lockup_period,
                perp.sqrt_price_impact_limit,
            ]),
        )
        .await;
        self.respond(
            perp_manager,
            "timeWeightedAvgSqrtPriceX96",
            encode_uint(perp.sqrt_price_x96),
        )
        .await;
        self.respond(perp_manager, "protocolFee", json!(1_000)).await;

        self.respond(&perp.margin_ratios, "MIN_TAKER_RATIO", json!(100_000)).await;
        self.respond(&perp.margin_ratios, "MAX_TAKER_RATIO", json!(500_000)).await;
        self.respond(&perp.margin_ratios, "LIQUIDATION_TAKER_RATIO", json!(50_000)).await;

        self.respond(&perp.fees, "CREATOR_FEE", json!(1_000)).await;
        self.respond(&perp.fees, "INSURANCE_FEE", json!(500)).await;
        self.respond(&perp.fees, "LP_FEE", json!(2_500)).await;
        self.respond(&perp.fees, "LIQUIDATION_FEE", json!(10_000)).await;
    }
}

/// Addresses and state of a perp installed into a [`MockLedger`]
#[derive(Debug, Clone)]
pub struct MockPerp {
    pub currency0: String,
    pub currency1: String,
    pub tick_spacing: i32,
    pub hooks: String,
    pub creator: String,
    pub vault: String,
    pub beacon: String,
    pub fees: String,
    pub margin_ratios: String,
    pub lockup_period: String,
    pub sqrt_price_impact_limit: String,
    pub sqrt_price_x96: perpcity_core::U256,
}

impl MockPerp {
    /// A perp at `sqrt_price_x96` with numbered placeholder addresses
    pub fn new(tick_spacing: i32, sqrt_price_x96: perpcity_core::U256) -> Self {
        Self {
            currency0: address(0xa0),
            currency1: address(0xa1),
            tick_spacing,
            hooks: address(0xa2),
            creator: address(0xa3),
            vault: address(0xa4),
            beacon: address(0xa5),
            fees: address(0xa6),
            margin_ratios: address(0xa7),
            lockup_period: address(0xa8),
            sqrt_price_impact_limit: address(0xa9),
            sqrt_price_x96,
        }
    }
}

/// `0x` address whose last byte is `tag`
pub fn address(tag: u8) -> String {
    format!("0x{:038x}{:02x}", 0, tag)
}

fn key(contract: &str, function: &str) -> String {
    format!("{}::{}", contract.to_ascii_lowercase(), function)
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn call(&self, request: CallRequest) -> SdkResult<Value> {
        let key = key(&request.contract, &request.function);
        self.calls.lock().await.push(request.clone());

        if let Some(message) = self.failures.lock().await.get(&key) {
            return Err(SdkError::ledger(&request.function, message));
        }

        self.responses
            .lock()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| SdkError::ledger(&request.function, format!("no response for {}", key)))
    }

    async fn submit(&self, request: SubmitRequest) -> SdkResult<Receipt> {
        let mut submissions = self.submissions.lock().await;
        submissions.push(request);

        Ok(Receipt {
            success: !self.revert_submissions,
            tx_id: format!("0x{:064x}", submissions.len()),
            logs: Vec::new(),
        })
    }

    async fn chain_id(&self) -> SdkResult<u64> {
        Ok(self.chain_id)
    }
}
