//! Purchase submission state machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy_primitives::U256;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::TransactionOutcome;
use crate::port::{NoticeKind, PurchaseGateway};
use crate::service::monitor::FundingMonitor;
use crate::service::notify::NoticeQueue;

/// Banner text for a confirmed purchase.
const SUCCESS_MESSAGE: &str = "Purchase successful!";

/// Fixed friendly message for the wallet's user-rejection condition.
const REJECTED_MESSAGE: &str = "Transaction rejected in your wallet.";

/// Observable phase of the buy flow. Maps onto the buy button label:
/// `Idle` renders as BUY NOW, `Pending` as PENDING... with the button
/// disabled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Pending,
    Succeeded {
        tx_hash: String,
    },
    Failed {
        message: String,
    },
}

/// Returns the machine to `Idle` if it is still `Pending` when dropped.
/// A `submit()` future cancelled mid-call (view unmounted, caller timed
/// out) would otherwise leave the machine `Pending` with no submission
/// behind it, and `rearm` refuses to clear a pending phase.
struct PendingReset<'a> {
    phase: &'a Mutex<SubmitPhase>,
}

impl Drop for PendingReset<'_> {
    fn drop(&mut self) {
        let mut phase = self.phase.lock();
        if matches!(*phase, SubmitPhase::Pending) {
            *phase = SubmitPhase::Idle;
        }
    }
}

/// Drives a purchase through the gateway and reconciles the aftermath:
/// exactly one funding refresh plus a success notice on confirmation, a
/// sanitized error notice on failure.
///
/// The machine runs `Idle -> Pending -> {Succeeded, Failed}`; a settled
/// phase holds until [`rearm`](Self::rearm) (the user editing the amount
/// field) returns it to `Idle`.
pub struct PurchaseSubmitter {
    gateway: Arc<dyn PurchaseGateway>,
    monitor: Arc<FundingMonitor>,
    notices: Arc<NoticeQueue>,
    phase: Mutex<SubmitPhase>,
    closed: AtomicBool,
}

impl PurchaseSubmitter {
    pub fn new(
        gateway: Arc<dyn PurchaseGateway>,
        monitor: Arc<FundingMonitor>,
        notices: Arc<NoticeQueue>,
    ) -> Self {
        Self {
            gateway,
            monitor,
            notices,
            phase: Mutex::new(SubmitPhase::Idle),
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn phase(&self) -> SubmitPhase {
        self.phase.lock().clone()
    }

    /// Return a settled machine to `Idle`. No effect while a submission is
    /// pending.
    pub fn rearm(&self) {
        let mut phase = self.phase.lock();
        if !matches!(*phase, SubmitPhase::Pending) {
            *phase = SubmitPhase::Idle;
        }
    }

    /// Submit a validated purchase.
    ///
    /// Re-entry while pending returns [`TransactionOutcome::Pending`]
    /// without a second gateway call; re-entry after settling returns the
    /// settled outcome until [`rearm`](Self::rearm).
    pub async fn submit(&self, amount_wei: U256) -> TransactionOutcome {
        {
            let mut phase = self.phase.lock();
            match &*phase {
                SubmitPhase::Pending => return TransactionOutcome::Pending,
                SubmitPhase::Succeeded { tx_hash } => {
                    return TransactionOutcome::Succeeded {
                        tx_hash: tx_hash.clone(),
                    }
                }
                SubmitPhase::Failed { message } => {
                    return TransactionOutcome::Failed(message.clone())
                }
                SubmitPhase::Idle => *phase = SubmitPhase::Pending,
            }
        }

        // Held until the phase settles below; a no-op once it has.
        let _reset = PendingReset { phase: &self.phase };
        let result = self.gateway.submit(amount_wei).await;

        if self.closed.load(Ordering::Acquire) {
            debug!("submitter closed while a purchase was outstanding; result dropped");
            return TransactionOutcome::Pending;
        }

        match result {
            Ok(TransactionOutcome::Succeeded { tx_hash }) => {
                *self.phase.lock() = SubmitPhase::Succeeded {
                    tx_hash: tx_hash.clone(),
                };
                info!(tx_hash = %tx_hash, amount = %amount_wei, "purchase confirmed");
                if let Err(e) = self.monitor.refresh().await {
                    warn!(error = %e, "post-purchase funding refresh failed");
                }
                self.notices.post(NoticeKind::Success, SUCCESS_MESSAGE);
                TransactionOutcome::Succeeded { tx_hash }
            }
            Ok(TransactionOutcome::Failed(reason)) => self.fail(&reason),
            // Gateways settle before returning; an unsettled outcome is a
            // broken collaborator and surfaces as a failure.
            Ok(TransactionOutcome::Pending) => self.fail("transaction did not settle"),
            Err(e) => self.fail(&e.to_string()),
        }
    }

    fn fail(&self, raw: &str) -> TransactionOutcome {
        let message = sanitize_wallet_error(raw);
        *self.phase.lock() = SubmitPhase::Failed {
            message: message.clone(),
        };
        warn!(reason = %message, "purchase failed");
        self.notices.post(NoticeKind::Error, message.clone());
        TransactionOutcome::Failed(message)
    }

    /// Stop applying results after view teardown. Terminal.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Reduce a raw wallet/provider error to something showable: first line
/// only, with the wallet's user-rejection wording mapped to a fixed
/// message instead of shown verbatim.
#[must_use]
pub fn sanitize_wallet_error(raw: &str) -> String {
    let lowered = raw.to_ascii_lowercase();
    if lowered.contains("user rejected") || lowered.contains("user denied") {
        return REJECTED_MESSAGE.to_string();
    }
    let first_line = raw.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        "Transaction failed".to_string()
    } else {
        first_line.to_string()
    }
}
