// Command modules for perpcity CLI

pub mod config;
pub mod liquidity;
pub mod plan;
pub mod price;
pub mod risk;
pub mod utils;
