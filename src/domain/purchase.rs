//! Purchase intent parsing and the buy-flow decision function.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::wallet::WalletState;
use super::WEI_PER_NATIVE;

/// A user-entered purchase amount, parsed once and discarded after
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseIntent {
    raw: String,
    parsed: Result<U256, ParseFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseFailure {
    NotNumeric,
    NotPositive,
}

impl PurchaseIntent {
    /// Parse free-form amount text into wei.
    ///
    /// Accepts decimal notation, exponent forms included (`"1e5"` reads as
    /// 100000, the way float parsing in amount fields usually does). Empty
    /// text, non-numeric text, and values too large to scale by 10^18 are
    /// not numeric; zero, negative, and sub-wei amounts are not positive.
    /// Sub-wei fractions of an otherwise positive amount truncate.
    pub fn new(raw_amount_text: impl Into<String>) -> Self {
        let raw = raw_amount_text.into();
        let parsed = parse_wei(&raw);
        Self { raw, parsed }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed wei amount, if the text was a positive number.
    #[must_use]
    pub fn amount_wei(&self) -> Option<U256> {
        self.parsed.ok()
    }
}

fn parse_wei(raw: &str) -> Result<U256, ParseFailure> {
    let amount = Decimal::from_str(raw.trim()).map_err(|_| ParseFailure::NotNumeric)?;
    if amount <= Decimal::ZERO {
        return Err(ParseFailure::NotPositive);
    }
    let scaled = amount
        .checked_mul(Decimal::from(WEI_PER_NATIVE))
        .ok_or(ParseFailure::NotNumeric)?;
    let wei = scaled.trunc().to_u128().ok_or(ParseFailure::NotNumeric)?;
    if wei == 0 {
        // positive text, but below one wei
        return Err(ParseFailure::NotPositive);
    }
    Ok(U256::from(wei))
}

/// Why a purchase attempt was refused. `Display` gives the user-facing
/// banner text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    NotConnected,
    BalanceUnknown,
    AmountNotPositive,
    AmountNotNumeric,
    InsufficientBalance,
    SimulationFailed,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotConnected => "Please connect your wallet!",
            Self::BalanceUnknown => "Fetching balance, please wait...",
            Self::AmountNotPositive => "Amount must be greater than zero",
            Self::AmountNotNumeric => "Please enter a valid amount",
            Self::InsufficientBalance => "Insufficient Balance!",
            Self::SimulationFailed => {
                "Transaction simulation failed. Check your input or network."
            }
        };
        f.write_str(message)
    }
}

/// Outcome of the buy-flow decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    /// The purchase may proceed with this wei value attached.
    Valid(U256),
    Invalid(InvalidReason),
}

impl ValidationResult {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    #[must_use]
    pub const fn reason(&self) -> Option<InvalidReason> {
        match self {
            Self::Invalid(reason) => Some(*reason),
            Self::Valid(_) => None,
        }
    }
}

/// Decide whether a purchase attempt may proceed.
///
/// Pure and side-effect free; safe to call on every keystroke or state
/// change. The short-circuit order is part of the contract - the first
/// failing check names the reason the user sees:
///
/// 1. wallet connected
/// 2. balance fresh
/// 3. amount parses to a positive number
/// 4. balance non-zero
/// 5. amount within balance
/// 6. upstream simulation passed
#[must_use]
pub fn validate(
    intent: &PurchaseIntent,
    wallet: &WalletState,
    simulation_ok: bool,
) -> ValidationResult {
    use InvalidReason::*;

    if !wallet.connected {
        return ValidationResult::Invalid(NotConnected);
    }
    if !wallet.balance_fresh {
        return ValidationResult::Invalid(BalanceUnknown);
    }
    let amount = match intent.parsed {
        Ok(amount) => amount,
        Err(ParseFailure::NotNumeric) => return ValidationResult::Invalid(AmountNotNumeric),
        Err(ParseFailure::NotPositive) => return ValidationResult::Invalid(AmountNotPositive),
    };
    if wallet.native_balance.is_zero() {
        return ValidationResult::Invalid(InsufficientBalance);
    }
    if amount > wallet.native_balance {
        return ValidationResult::Invalid(InsufficientBalance);
    }
    if !simulation_ok {
        return ValidationResult::Invalid(SimulationFailed);
    }
    ValidationResult::Valid(amount)
}

/// Final state of a submitted purchase as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    Pending,
    Succeeded { tx_hash: String },
    Failed(String),
}

impl TransactionOutcome {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}
