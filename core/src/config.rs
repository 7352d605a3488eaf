//! Mint configuration: the single target network and the mint contract.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::ChainId;

/// Zora Sepolia testnet.
pub const DEFAULT_CHAIN_ID: u64 = 999_999_999;

/// Where mints go. Defaults can be baked in at build time through
/// `PROMRAW_CHAIN_ID` and `PROMRAW_CONTRACT_ADDRESS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MintConfig {
    pub target_chain_id: ChainId,
    pub contract_address: String,
}

impl Default for MintConfig {
    fn default() -> Self {
        let chain = option_env!("PROMRAW_CHAIN_ID")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_CHAIN_ID);
        Self {
            target_chain_id: ChainId(chain),
            contract_address: option_env!("PROMRAW_CONTRACT_ADDRESS")
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl MintConfig {
    pub fn new(target_chain_id: u64, contract_address: &str) -> Result<Self, ConfigError> {
        let cfg = Self {
            target_chain_id: ChainId(target_chain_id),
            contract_address: contract_address.trim().to_string(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse from JSON; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut cfg: MintConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.contract_address = cfg.contract_address.trim().to_string();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_chain_id.0 == 0 {
            return Err(ConfigError::ZeroChainId);
        }
        if self.contract_address.is_empty() {
            return Err(ConfigError::MissingContract);
        }
        if !is_evm_address(&self.contract_address) {
            return Err(ConfigError::MalformedContract(
                self.contract_address.clone(),
            ));
        }
        Ok(())
    }
}

fn is_evm_address(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}
