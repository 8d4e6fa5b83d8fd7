//! Builders for domain values used across tests.
//!
//! Concise factories for wei amounts, wallet snapshots, and funding
//! snapshots so tests focus on assertions rather than construction
//! boilerplate.

use alloy_primitives::{Address, U256};

use crate::domain::{FundingSnapshot, WalletState, WEI_PER_NATIVE};

/// One whole native token in wei.
pub fn one_token() -> U256 {
    U256::from(WEI_PER_NATIVE)
}

/// `n` wei.
pub fn wei(n: u64) -> U256 {
    U256::from(n)
}

/// `n` whole native tokens in wei.
pub fn ether(n: u64) -> U256 {
    U256::from(n) * one_token()
}

/// A deterministic test address.
pub fn test_address() -> Address {
    Address::repeat_byte(0x11)
}

/// A connected wallet with a settled balance.
pub fn connected_wallet(native_balance: U256) -> WalletState {
    WalletState::connected(test_address(), native_balance)
}

/// A funding snapshot in whole tokens.
pub fn snapshot(raised_tokens: u64, cap_tokens: u64) -> FundingSnapshot {
    FundingSnapshot::new(ether(raised_tokens), ether(cap_tokens))
}
