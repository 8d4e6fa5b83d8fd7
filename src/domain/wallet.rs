//! Wallet connection snapshot consumed by the validator.

use alloy_primitives::{Address, U256};

/// Read-only snapshot of the external wallet connector's state.
///
/// The connector owns this data; the core only receives fresh snapshots and
/// never mutates one in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletState {
    pub address: Option<Address>,
    pub connected: bool,
    /// Native-currency balance in smallest units.
    pub native_balance: U256,
    /// False while a balance query is still in flight.
    pub balance_fresh: bool,
}

impl WalletState {
    /// Snapshot for a wallet that has not been connected.
    #[must_use]
    pub const fn disconnected() -> Self {
        Self {
            address: None,
            connected: false,
            native_balance: U256::ZERO,
            balance_fresh: false,
        }
    }

    /// Snapshot for a connected wallet with a settled balance.
    #[must_use]
    pub const fn connected(address: Address, native_balance: U256) -> Self {
        Self {
            address: Some(address),
            connected: true,
            native_balance,
            balance_fresh: true,
        }
    }

    /// Same snapshot with the balance marked stale (query in flight).
    #[must_use]
    pub fn with_stale_balance(mut self) -> Self {
        self.balance_fresh = false;
        self
    }
}

impl Default for WalletState {
    fn default() -> Self {
        Self::disconnected()
    }
}
