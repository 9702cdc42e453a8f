//! # PerpCity SDK
//!
//! Services that read PerpCity markets and positions through a
//! [`LedgerClient`] and plan position changes with `perpcity-core` math.
//!
//! ```text
//! LedgerClient ──► MarketService ──► PerpData (mark, bounds, fees)
//!              ├─► PositionService ─► PositionMetrics
//!              └─► TradeService ───► maker / taker / close plans ─► submit
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod ledger;
pub mod testing;

pub use client::{
    ClosePlan, ClosePositionParams, CreatePerpParams, CreatePerpPlan, MakerLiquidity,
    MakerOpenPlan, MarketService, OpenMakerParams, OpenTakerParams, PerpCityClient,
    PositionService, PositionSnapshot, TakerOpenPlan, TradeService,
};
pub use config::{DeploymentModules, SdkConfig, DEFAULT_CHAIN_ID, DEFAULT_CLOSE_GAS_LIMIT};
pub use error::{SdkError, SdkResult};
pub use ledger::{CallRequest, LedgerClient, Receipt, SubmitRequest};

// Core math and types
pub use perpcity_core;
