//! Mock sale port implementations for testing.
//!
//! Two mock types for different testing needs:
//!
//! - [`FixedSaleReader`] — Fixed counter values with call counting, an
//!   optional gate that holds reads open, and a failure switch.
//!   Best for: coalescing, teardown guards, poll-loop behavior.
//!
//! - [`ScriptedGateway`] — Pre-loaded simulate/submit results popped per
//!   call (defaults when exhausted). Best for: the submitter state machine.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use alloy_primitives::U256;
use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::domain::TransactionOutcome;
use crate::error::{ChainError, Result};
use crate::port::{PurchaseGateway, SaleReader};

async fn wait_gate(gate: &Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }
}

/// A mock reader with fixed counters.
///
/// With a gate attached, each read consumes one semaphore permit before
/// returning; tests release reads with `add_permits`.
pub struct FixedSaleReader {
    raised: Mutex<U256>,
    cap: Mutex<U256>,
    failing: AtomicBool,
    gate: Option<Arc<Semaphore>>,
    current_calls: AtomicU32,
    hard_calls: AtomicU32,
}

impl FixedSaleReader {
    pub fn new(raised: U256, cap: U256) -> Self {
        Self {
            raised: Mutex::new(raised),
            cap: Mutex::new(cap),
            failing: AtomicBool::new(false),
            gate: None,
            current_calls: AtomicU32::new(0),
            hard_calls: AtomicU32::new(0),
        }
    }

    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Change the raised counter, e.g. to model progress between polls.
    pub fn set_raised(&self, raised: U256) {
        *self.raised.lock().unwrap() = raised;
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn current_cap_calls(&self) -> u32 {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn hard_cap_calls(&self) -> u32 {
        self.hard_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SaleReader for FixedSaleReader {
    async fn read_current_cap(&self) -> Result<U256> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        wait_gate(&self.gate).await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChainError::ReadFailed {
                field: "currentCap",
                reason: "scripted failure".into(),
            }
            .into());
        }
        Ok(*self.raised.lock().unwrap())
    }

    async fn read_hard_cap(&self) -> Result<U256> {
        self.hard_calls.fetch_add(1, Ordering::SeqCst);
        wait_gate(&self.gate).await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChainError::ReadFailed {
                field: "hardCap",
                reason: "scripted failure".into(),
            }
            .into());
        }
        Ok(*self.cap.lock().unwrap())
    }
}

/// A mock gateway with scripted simulate/submit results.
///
/// Each call pops the next result from the corresponding queue; exhausted
/// queues default to `Ok(true)` for simulate and a generic success for
/// submit.
pub struct ScriptedGateway {
    simulate_results: Mutex<VecDeque<Result<bool>>>,
    submit_results: Mutex<VecDeque<Result<TransactionOutcome>>>,
    simulate_calls: AtomicU32,
    submit_calls: AtomicU32,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            simulate_results: Mutex::new(VecDeque::new()),
            submit_results: Mutex::new(VecDeque::new()),
            simulate_calls: AtomicU32::new(0),
            submit_calls: AtomicU32::new(0),
            gate: None,
        }
    }

    pub fn with_simulate_results(self, results: Vec<Result<bool>>) -> Self {
        *self.simulate_results.lock().unwrap() = results.into();
        self
    }

    pub fn with_submit_results(self, results: Vec<Result<TransactionOutcome>>) -> Self {
        *self.submit_results.lock().unwrap() = results.into();
        self
    }

    /// Hold each submit open until a permit is released.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn simulate_calls(&self) -> u32 {
        self.simulate_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PurchaseGateway for ScriptedGateway {
    async fn simulate(&self, _value: U256) -> Result<bool> {
        self.simulate_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(true))
    }

    async fn submit(&self, _value: U256) -> Result<TransactionOutcome> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        wait_gate(&self.gate).await;
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(TransactionOutcome::Succeeded {
                    tx_hash: "0xtest".into(),
                })
            })
    }
}
