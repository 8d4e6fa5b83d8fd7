//! Capflow - presale funding-state monitoring and buy-flow validation.
//!
//! This crate implements the core logic of a token-presale client: reading
//! the sale counters from a deployed contract, deciding whether a purchase
//! attempt may proceed, and driving the purchase submission state machine.
//! Everything presentational (rendering, routing, wallet UI) and everything
//! chain-internal (consensus, key custody) lives outside this crate.
//!
//! # Architecture
//!
//! Three cooperating pieces sit behind small ports:
//!
//! - **`service::FundingMonitor`** - reads `currentCap`/`hardCap` through a
//!   [`SaleReader`](port::SaleReader), coalesces overlapping refreshes into a
//!   single in-flight read pair, and publishes a [`FundingState`](domain::FundingState)
//!   that is `Loading`/`Unavailable` rather than a bogus zero while data is
//!   missing.
//! - **`domain::validate`** - a pure decision function over a
//!   [`PurchaseIntent`](domain::PurchaseIntent), a [`WalletState`](domain::WalletState)
//!   snapshot, and an upstream simulation flag. Safe to call on every
//!   keystroke; the check order is part of the contract.
//! - **`service::PurchaseSubmitter`** - the `Idle -> Pending -> settled`
//!   machine around a [`PurchaseGateway`](port::PurchaseGateway). A confirmed
//!   purchase triggers exactly one monitor refresh and a success notice.
//!
//! User-facing notices flow through [`service::NoticeQueue`], which gives
//! every notice an explicit sequence number so duplicate suppression and
//! forced re-display are decisions, not render-timing accidents.
//!
//! # Modules
//!
//! - [`config`] - TOML configuration; the presale contract address is a
//!   required value with no shipped default
//! - [`domain`] - snapshot types, intent parsing, the validation function
//! - [`port`] - `SaleReader`, `PurchaseGateway`, and notifier traits
//! - [`service`] - monitor, submitter, and notice queue
//! - [`adapter`] - alloy JSON-RPC implementation of both sale ports
//! - [`error`] - error types for the crate
//!
//! # Example
//!
//! ```
//! use capflow::domain::{validate, PurchaseIntent, ValidationResult, WalletState};
//! use alloy_primitives::{Address, U256};
//!
//! let wallet = WalletState::connected(
//!     Address::repeat_byte(0x11),
//!     U256::from(1_000_000_000_000_000_000u64), // 1 whole token
//! );
//! let intent = PurchaseIntent::new("0.5");
//!
//! match validate(&intent, &wallet, true) {
//!     ValidationResult::Valid(wei) => assert_eq!(wei, U256::from(500_000_000_000_000_000u64)),
//!     ValidationResult::Invalid(reason) => panic!("unexpected: {reason}"),
//! }
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod port;
pub mod service;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
