//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`sale`] — Mock [`SaleReader`](crate::port::SaleReader) and
//!   [`PurchaseGateway`](crate::port::PurchaseGateway) implementations with
//!   call counting and gating.
//! - [`domain`] — Builders for wallet states, snapshots, and wei amounts.

pub mod domain;
pub mod sale;
