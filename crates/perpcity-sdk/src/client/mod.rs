pub mod market;
pub mod position;
pub mod trade;

use std::sync::Arc;

use serde_json::Value;

use crate::{
    config::SdkConfig,
    error::{SdkError, SdkResult},
    ledger::{CallRequest, LedgerClient, Receipt, SubmitRequest},
};

pub use market::MarketService;
pub use position::{PositionService, PositionSnapshot};
pub use trade::{
    ClosePlan, ClosePositionParams, CreatePerpParams, CreatePerpPlan, MakerLiquidity,
    MakerOpenPlan, OpenMakerParams, OpenTakerParams, TakerOpenPlan, TradeService,
};

/// Main PerpCity client with service-based architecture
pub struct PerpCityClient {
    /// Ledger client shared by every service
    pub ledger: Arc<dyn LedgerClient>,
    /// Deployment configuration
    pub config: Arc<SdkConfig>,
    /// Market reads: configuration, mark price, bounds and fees
    pub market: MarketService,
    /// Position reads and risk views
    pub position: PositionService,
    /// Open / close planning and submission
    pub trade: TradeService,
}

impl PerpCityClient {
    /// Create a client over an existing ledger connection
    pub fn new(config: SdkConfig, ledger: Arc<dyn LedgerClient>) -> SdkResult<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let market = MarketService::new(ledger.clone(), config.clone());
        let position = PositionService::new(ledger.clone(), config.clone(), market.clone());
        let trade = TradeService::new(ledger.clone(), config.clone(), market.clone());

        Ok(Self {
            ledger,
            config,
            market,
            position,
            trade,
        })
    }

    /// Create a client and check the endpoint serves the configured chain
    pub async fn connect(config: SdkConfig, ledger: Arc<dyn LedgerClient>) -> SdkResult<Self> {
        let client = Self::new(config, ledger)?;
        client.market.validate_chain_id().await?;
        Ok(client)
    }
}

/// Issue a view call, tagging failures with the function name
pub(crate) async fn view(
    ledger: &dyn LedgerClient,
    contract: &str,
    function: &str,
    args: Vec<Value>,
) -> SdkResult<Value> {
    ledger
        .call(CallRequest::new(contract, function, args))
        .await
        .map_err(|e| match e {
            SdkError::Ledger { message, .. } => SdkError::ledger(function, message),
            other => other,
        })
}

/// Submit a transaction and fail on a reverted receipt
pub(crate) async fn execute(ledger: &dyn LedgerClient, request: SubmitRequest) -> SdkResult<Receipt> {
    let function = request.function.clone();
    let receipt = ledger.submit(request).await.map_err(|e| match e {
        SdkError::Ledger { message, .. } => SdkError::ledger(&function, message),
        other => other,
    })?;

    if !receipt.success {
        return Err(SdkError::ledger(
            function,
            format!("Transaction reverted. Hash: {}", receipt.tx_id),
        ));
    }

    Ok(receipt)
}
