//! Core value types for the presale buy flow.

mod funding;
mod purchase;
mod wallet;

/// Wei per whole native token (18 decimals).
pub const WEI_PER_NATIVE: u64 = 1_000_000_000_000_000_000;

pub use funding::{FundingSnapshot, FundingState};
pub use purchase::{validate, InvalidReason, PurchaseIntent, TransactionOutcome, ValidationResult};
pub use wallet::WalletState;
