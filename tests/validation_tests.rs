//! Integration tests for the buy-flow decision function.

use alloy_primitives::U256;
use capflow::domain::{validate, InvalidReason, PurchaseIntent, ValidationResult, WalletState};
use capflow::testkit::domain::{connected_wallet, ether, one_token, test_address, wei};

#[test]
fn disconnected_wallet_wins_over_everything_else() {
    // every other field is also invalid; the first check must name the reason
    let wallet = WalletState::disconnected();
    let result = validate(&PurchaseIntent::new("not a number"), &wallet, false);
    assert_eq!(result.reason(), Some(InvalidReason::NotConnected));
}

#[test]
fn stale_balance_is_reported_before_amount_problems() {
    let wallet = connected_wallet(ether(1)).with_stale_balance();
    let result = validate(&PurchaseIntent::new("abc"), &wallet, true);
    assert_eq!(result.reason(), Some(InvalidReason::BalanceUnknown));
}

#[test]
fn zero_amount_with_funds_available() {
    let wallet = connected_wallet(wei(10));
    let result = validate(&PurchaseIntent::new("0"), &wallet, true);
    assert_eq!(result.reason(), Some(InvalidReason::AmountNotPositive));
}

#[test]
fn non_numeric_amount() {
    let wallet = connected_wallet(ether(1));
    let result = validate(&PurchaseIntent::new("1.2.3"), &wallet, true);
    assert_eq!(result.reason(), Some(InvalidReason::AmountNotNumeric));
}

#[test]
fn empty_wallet_is_insufficient_regardless_of_amount() {
    let wallet = connected_wallet(U256::ZERO);
    let result = validate(&PurchaseIntent::new("0.1"), &wallet, true);
    assert_eq!(result.reason(), Some(InvalidReason::InsufficientBalance));
}

#[test]
fn amount_exceeding_balance_is_insufficient() {
    // 5 whole tokens against a 1-wei balance
    let wallet = connected_wallet(wei(1));
    let result = validate(&PurchaseIntent::new("5"), &wallet, true);
    assert_eq!(result.reason(), Some(InvalidReason::InsufficientBalance));
}

#[test]
fn failed_simulation_blocks_an_otherwise_valid_purchase() {
    let wallet = connected_wallet(ether(1));
    let result = validate(&PurchaseIntent::new("0.5"), &wallet, false);
    assert_eq!(result.reason(), Some(InvalidReason::SimulationFailed));
}

#[test]
fn valid_purchase_carries_the_wei_amount() {
    let wallet = connected_wallet(one_token());
    let result = validate(&PurchaseIntent::new("0.5"), &wallet, true);
    assert_eq!(
        result,
        ValidationResult::Valid(U256::from(500_000_000_000_000_000u64))
    );
}

#[test]
fn amount_equal_to_balance_is_allowed() {
    let wallet = connected_wallet(one_token());
    let result = validate(&PurchaseIntent::new("1"), &wallet, true);
    assert_eq!(result, ValidationResult::Valid(one_token()));
}

#[test]
fn validate_is_pure() {
    let wallet = WalletState::connected(test_address(), ether(3));
    let intent = PurchaseIntent::new("1.5");
    let first = validate(&intent, &wallet, true);
    let second = validate(&intent, &wallet, true);
    assert_eq!(first, second);
    assert!(first.is_valid());
}

#[test]
fn reasons_render_user_facing_messages() {
    assert_eq!(
        InvalidReason::NotConnected.to_string(),
        "Please connect your wallet!"
    );
    assert_eq!(
        InvalidReason::InsufficientBalance.to_string(),
        "Insufficient Balance!"
    );
}
