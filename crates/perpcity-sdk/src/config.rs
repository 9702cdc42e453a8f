use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Base Sepolia
pub const DEFAULT_CHAIN_ID: u64 = 84_532;

/// Gas hint sent with `closePosition`
pub const DEFAULT_CLOSE_GAS_LIMIT: u64 = 500_000;

/// SDK configuration loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SdkConfig {
    /// Endpoint the ledger client talks to
    pub rpc_url: String,

    /// Chain the deployment lives on
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Perp manager contract address
    pub perp_manager: String,

    /// Collateral token address
    pub usdc: String,

    /// Gas hint for closing positions
    #[serde(default = "default_close_gas_limit")]
    pub close_gas_limit: u64,

    /// Default module contracts used when creating perps
    #[serde(default)]
    pub modules: DeploymentModules,
}

/// Module contracts of a deployment; any of them may be left to the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeploymentModules {
    pub fees: Option<String>,
    pub margin_ratios: Option<String>,
    pub lockup_period: Option<String>,
    pub sqrt_price_impact_limit: Option<String>,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_close_gas_limit() -> u64 {
    DEFAULT_CLOSE_GAS_LIMIT
}

impl SdkConfig {
    /// Minimal configuration for a deployment
    pub fn new(rpc_url: impl Into<String>, perp_manager: impl Into<String>, usdc: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id: DEFAULT_CHAIN_ID,
            perp_manager: perp_manager.into(),
            usdc: usdc.into(),
            close_gas_limit: DEFAULT_CLOSE_GAS_LIMIT,
            modules: DeploymentModules::default(),
        }
    }

    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SdkError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            SdkError::Config(message) => {
                SdkError::Config(format!("{} ({})", message, path.display()))
            }
            other => other,
        })
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> SdkResult<Self> {
        let config: SdkConfig = toml::from_str(content)
            .map_err(|e| SdkError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> SdkResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| SdkError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            SdkError::Config(format!("Failed to write config file {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SdkResult<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(invalid_field("rpc_url", "empty", "non-empty URL"));
        }

        if self.chain_id == 0 {
            return Err(invalid_field("chain_id", "0", "greater than 0"));
        }

        if self.close_gas_limit == 0 {
            return Err(invalid_field("close_gas_limit", "0", "greater than 0"));
        }

        check_address("perp_manager", &self.perp_manager)?;
        check_address("usdc", &self.usdc)?;

        self.modules.validate()
    }
}

impl DeploymentModules {
    fn validate(&self) -> SdkResult<()> {
        let entries = [
            ("modules.fees", &self.fees),
            ("modules.margin_ratios", &self.margin_ratios),
            ("modules.lockup_period", &self.lockup_period),
            ("modules.sqrt_price_impact_limit", &self.sqrt_price_impact_limit),
        ];

        for (field, value) in entries {
            if let Some(address) = value {
                check_address(field, address)?;
            }
        }

        Ok(())
    }
}

fn invalid_field(field: &str, value: &str, expected: &str) -> SdkError {
    SdkError::Config(format!("Invalid {}: got {}, expected {}", field, value, expected))
}

/// `0x` followed by 40 hex digits
pub fn is_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .map(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

fn check_address(field: &str, value: &str) -> SdkResult<()> {
    if !is_address(value) {
        return Err(invalid_field(field, value, "a 0x-prefixed 20-byte hex address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANAGER: &str = "0x1111111111111111111111111111111111111111";
    const USDC: &str = "0x2222222222222222222222222222222222222222";

    #[test]
    fn test_defaults_applied() {
        let content = format!(
            "rpc_url = \"https://sepolia.base.org\"\nperp_manager = \"{}\"\nusdc = \"{}\"\n",
            MANAGER, USDC
        );
        let config = SdkConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.chain_id, DEFAULT_CHAIN_ID);
        assert_eq!(config.close_gas_limit, DEFAULT_CLOSE_GAS_LIMIT);
        assert_eq!(config.modules, DeploymentModules::default());
    }

    #[test]
    fn test_modules_parsed() {
        let content = format!(
            "rpc_url = \"http://localhost:8545\"\nchain_id = 31337\nperp_manager = \"{}\"\nusdc = \"{}\"\n\n[modules]\nfees = \"{}\"\n",
            MANAGER, USDC, USDC
        );
        let config = SdkConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.modules.fees.as_deref(), Some(USDC));
        assert!(config.modules.margin_ratios.is_none());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = SdkConfig::new("http://localhost:8545", MANAGER, USDC);
        assert!(config.validate().is_ok());

        config.perp_manager = "0x1234".to_string();
        assert!(matches!(config.validate(), Err(SdkError::Config(_))));

        let mut config = SdkConfig::new("", MANAGER, USDC);
        assert!(config.validate().is_err());

        config.rpc_url = "http://localhost:8545".to_string();
        config.chain_id = 0;
        assert!(config.validate().is_err());

        let mut config = SdkConfig::new("http://localhost:8545", MANAGER, USDC);
        config.modules.lockup_period = Some("lockup".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("perpcity-config-{}.toml", std::process::id()));
        let config = SdkConfig::new("http://localhost:8545", MANAGER, USDC);
        config.save(&path).unwrap();

        let loaded = SdkConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file() {
        let err = SdkConfig::load("/nonexistent/perpcity.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
