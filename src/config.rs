use std::path::Path;

use alloy_primitives::Address;
use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, Result};
use crate::logging::LoggingConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub presale: PresaleConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Presale contract settings.
///
/// `contract_address` has no shipped default on purpose: deployments of this
/// sale have circulated under more than one address, so the authoritative
/// one must be stated explicitly per environment.
#[derive(Debug, Deserialize)]
pub struct PresaleConfig {
    pub contract_address: String,
    pub rpc_url: String,
    pub chain_id: u64,
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Auto-dismiss interval for user notices, in milliseconds.
    pub dismiss_ms: u64,
}

fn default_poll_secs() -> u64 {
    15
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { dismiss_ms: 4_500 }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.presale.contract_address.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "presale.contract_address",
            }
            .into());
        }
        self.presale.contract_address()?;
        self.presale.rpc_url()?;
        if self.presale.chain_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "presale.chain_id",
                reason: "must be non-zero".into(),
            }
            .into());
        }
        if self.presale.poll_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "presale.poll_secs",
                reason: "must be non-zero".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Wallet private key from the environment (never from the config file).
    ///
    /// Reads `WALLET_PRIVATE_KEY`, loading a `.env` file if one is present.
    pub fn wallet_private_key() -> Option<String> {
        dotenvy::dotenv().ok();
        std::env::var("WALLET_PRIVATE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl PresaleConfig {
    pub fn contract_address(&self) -> Result<Address> {
        self.contract_address.parse::<Address>().map_err(|e| {
            ConfigError::InvalidValue {
                field: "presale.contract_address",
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn rpc_url(&self) -> Result<Url> {
        self.rpc_url.parse::<Url>().map_err(|e| {
            ConfigError::InvalidValue {
                field: "presale.rpc_url",
                reason: e.to_string(),
            }
            .into()
        })
    }
}
