//! Alloy-backed presale contract adapter.
//!
//! Implements both sale ports against a JSON-RPC endpoint: view reads for
//! the funding counters, an `eth_call` dry-run for simulation, and a signed
//! `buyTokens` submission for purchases. Reads need no key; writes require
//! one attached via [`PresaleRpc::with_signer`].

use std::str::FromStr;

use alloy_contract::Error as ContractError;
use alloy_primitives::{Address, U256};
use alloy_provider::network::EthereumWallet;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer::Signer as _;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::config::PresaleConfig;
use crate::domain::TransactionOutcome;
use crate::error::{ChainError, ConfigError, Result, SubmissionError};
use crate::port::{PurchaseGateway, SaleReader};

// Presale interface (cap reads + payable buy)
sol! {
    #[sol(rpc)]
    contract IPresale {
        function currentCap() external view returns (uint256);
        function hardCap() external view returns (uint256);
        function buyTokens() external payable;
    }
}

/// JSON-RPC implementation of [`SaleReader`] and [`PurchaseGateway`].
pub struct PresaleRpc {
    rpc_url: Url,
    contract: Address,
    signer: Option<PrivateKeySigner>,
}

impl PresaleRpc {
    /// Build a read-only adapter from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the contract address or RPC URL is invalid.
    pub fn new(config: &PresaleConfig) -> Result<Self> {
        Ok(Self {
            rpc_url: config.rpc_url()?,
            contract: config.contract_address()?,
            signer: None,
        })
    }

    /// Attach a signing key for purchase submissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not parse.
    pub fn with_signer(mut self, private_key: &str, chain_id: u64) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(private_key)
            .map_err(|e| ConfigError::InvalidValue {
                field: "WALLET_PRIVATE_KEY",
                reason: e.to_string(),
            })?
            .with_chain_id(Some(chain_id));
        self.signer = Some(signer);
        Ok(self)
    }

    fn signer(&self) -> Result<&PrivateKeySigner> {
        self.signer.as_ref().ok_or_else(|| {
            ConfigError::MissingField {
                field: "WALLET_PRIVATE_KEY",
            }
            .into()
        })
    }

    /// Address of the attached signing key, if any.
    #[must_use]
    pub fn wallet_address(&self) -> Option<Address> {
        self.signer.as_ref().map(PrivateKeySigner::address)
    }

    /// Native-currency balance for an account, in smallest units. Lets a
    /// headless integrator assemble a `WalletState` snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    pub async fn native_balance(&self, address: Address) -> Result<U256> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        provider
            .get_balance(address)
            .await
            .map_err(|e| ChainError::BalanceFailed(e.to_string()).into())
    }
}

#[async_trait]
impl SaleReader for PresaleRpc {
    async fn read_current_cap(&self) -> Result<U256> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let presale = IPresale::new(self.contract, &provider);
        let raised = presale
            .currentCap()
            .call()
            .await
            .map_err(|e| ChainError::ReadFailed {
                field: "currentCap",
                reason: e.to_string(),
            })?;
        debug!(current_cap = %raised, "read current cap");
        Ok(raised)
    }

    async fn read_hard_cap(&self) -> Result<U256> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let presale = IPresale::new(self.contract, &provider);
        let cap = presale
            .hardCap()
            .call()
            .await
            .map_err(|e| ChainError::ReadFailed {
                field: "hardCap",
                reason: e.to_string(),
            })?;
        debug!(hard_cap = %cap, "read hard cap");
        Ok(cap)
    }
}

#[async_trait]
impl PurchaseGateway for PresaleRpc {
    async fn simulate(&self, value: U256) -> Result<bool> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let presale = IPresale::new(self.contract, &provider);
        match presale.buyTokens().value(value).call().await {
            Ok(_) => Ok(true),
            // The node executed the call and rejected it: a revert, which is
            // an answer ("this purchase would fail"), not a transport fault.
            Err(ContractError::TransportError(e)) if e.as_error_resp().is_some() => {
                debug!(error = %e, value = %value, "buy simulation reverted");
                Ok(false)
            }
            // The dry run itself could not be made.
            Err(e) => Err(SubmissionError::SimulationFailed(e.to_string()).into()),
        }
    }

    async fn submit(&self, value: U256) -> Result<TransactionOutcome> {
        let wallet = EthereumWallet::from(self.signer()?.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());
        let presale = IPresale::new(self.contract, &provider);

        let pending = presale
            .buyTokens()
            .value(value)
            .send()
            .await
            .map_err(|e| SubmissionError::SubmissionFailed(e.to_string()))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| SubmissionError::ReceiptFailed(e.to_string()))?;

        let tx_hash = format!("{:?}", receipt.transaction_hash);
        if receipt.status() {
            info!(tx_hash = %tx_hash, value = %value, "buyTokens confirmed");
            Ok(TransactionOutcome::Succeeded { tx_hash })
        } else {
            Ok(TransactionOutcome::Failed(format!(
                "transaction {tx_hash} reverted"
            )))
        }
    }
}
