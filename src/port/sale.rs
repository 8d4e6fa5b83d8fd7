//! Ports for the presale contract.
//!
//! One read abstraction covers every way of reaching the sale counters -
//! direct node client or higher-level contract binding - so the monitor's
//! percent logic exists exactly once.

use alloy_primitives::U256;
use async_trait::async_trait;

use crate::domain::TransactionOutcome;
use crate::error::Result;

/// Read-only view of the sale counters.
#[async_trait]
pub trait SaleReader: Send + Sync {
    /// Amount raised so far (`currentCap`), in smallest units.
    async fn read_current_cap(&self) -> Result<U256>;

    /// Fundraising ceiling (`hardCap`), in smallest units.
    async fn read_hard_cap(&self) -> Result<U256>;
}

/// Write-side port for the buy call.
#[async_trait]
pub trait PurchaseGateway: Send + Sync {
    /// Dry-run the buy call with `value` attached. `Ok(false)` means the
    /// call would revert; `Err` means the dry run itself could not be made.
    async fn simulate(&self, value: U256) -> Result<bool>;

    /// Submit the buy call and wait for it to settle. A mined-but-reverted
    /// transaction comes back as [`TransactionOutcome::Failed`], not as an
    /// `Err`; `Err` is reserved for the submission never reaching the chain
    /// (including wallet rejection).
    async fn submit(&self, value: U256) -> Result<TransactionOutcome>;
}
