//! Coordinating services: the funding monitor, the purchase submitter, and
//! the notice queue that carries their user-facing output.

mod monitor;
mod notify;
mod submitter;

pub use monitor::FundingMonitor;
pub use notify::{NoticeQueue, DEFAULT_DISMISS};
pub use submitter::{sanitize_wallet_error, PurchaseSubmitter, SubmitPhase};
