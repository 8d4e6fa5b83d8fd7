//! Funding state monitor with coalesced refreshes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{FundingSnapshot, FundingState};
use crate::error::{Error, Result};
use crate::port::SaleReader;

/// Shared outcome of one in-flight read pair.
#[derive(Debug, Clone, Copy)]
enum FlightOutcome {
    Ready(FundingSnapshot),
    Unavailable,
    /// The leader future was dropped before settling; waiters race for
    /// leadership again.
    Abandoned,
}

type FlightReceiver = watch::Receiver<Option<FlightOutcome>>;

/// Leadership token for one read pair.
///
/// Dropping it without [`finish`](Self::finish) - which is exactly what
/// happens when the leader's `refresh()` future is cancelled mid-read -
/// clears the flight slot and wakes waiters with `Abandoned`, so the
/// monitor can never stay wedged behind a leader that no longer exists.
struct FlightGuard<'a> {
    monitor: &'a FundingMonitor,
    tx: Option<watch::Sender<Option<FlightOutcome>>>,
}

impl FlightGuard<'_> {
    fn finish(mut self, outcome: FlightOutcome) {
        self.complete(outcome);
    }

    fn complete(&mut self, outcome: FlightOutcome) {
        if let Some(tx) = self.tx.take() {
            *self.monitor.flight.lock() = None;
            tx.send_replace(Some(outcome));
        }
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.complete(FlightOutcome::Abandoned);
    }
}

enum Flight<'a> {
    Leader(FlightGuard<'a>),
    Follower(FlightReceiver),
}

/// Polls the two sale counters and publishes a [`FundingState`].
///
/// Overlapping refreshes are single-flight: at most one read pair is
/// outstanding, and refreshes issued meanwhile await and reuse the leader's
/// result. After [`close`](Self::close), in-flight results are dropped
/// instead of applied.
pub struct FundingMonitor {
    reader: Arc<dyn SaleReader>,
    state: watch::Sender<FundingState>,
    flight: Mutex<Option<FlightReceiver>>,
    closed: AtomicBool,
}

impl FundingMonitor {
    pub fn new(reader: Arc<dyn SaleReader>) -> Self {
        let (state, _) = watch::channel(FundingState::Loading);
        Self {
            reader,
            state,
            flight: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// Last published state. `Loading` until the first read pair completes.
    #[must_use]
    pub fn current(&self) -> FundingState {
        *self.state.borrow()
    }

    /// Subscribe to state changes, e.g. to drive a progress bar.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FundingState> {
        self.state.subscribe()
    }

    /// Re-read both sale counters and publish the result.
    ///
    /// If a refresh is already outstanding this call waits for it and shares
    /// its result instead of issuing a second read pair. If the outstanding
    /// leader is cancelled before settling, one waiter takes over.
    pub async fn refresh(&self) -> Result<FundingSnapshot> {
        loop {
            if self.closed.load(Ordering::Acquire) {
                return Err(Error::MonitorClosed);
            }

            match self.join_flight() {
                Flight::Follower(mut rx) => {
                    let outcome = loop {
                        if let Some(outcome) = *rx.borrow_and_update() {
                            break outcome;
                        }
                        if rx.changed().await.is_err() {
                            break FlightOutcome::Abandoned;
                        }
                    };
                    match outcome {
                        FlightOutcome::Ready(snapshot) => return Ok(snapshot),
                        FlightOutcome::Unavailable => return Err(Error::FundingUnavailable),
                        FlightOutcome::Abandoned => continue,
                    }
                }
                Flight::Leader(guard) => {
                    let result = self.read_pair().await;

                    if self.closed.load(Ordering::Acquire) {
                        debug!("monitor closed while a refresh was outstanding; result dropped");
                        return Err(Error::MonitorClosed);
                    }

                    return match result {
                        Ok(snapshot) => {
                            self.state.send_replace(FundingState::Ready(snapshot));
                            debug!(
                                raised = %snapshot.raised,
                                cap = %snapshot.cap,
                                percent = snapshot.percent(),
                                "funding state refreshed"
                            );
                            guard.finish(FlightOutcome::Ready(snapshot));
                            Ok(snapshot)
                        }
                        Err(e) => {
                            warn!(error = %e, "sale counters unavailable");
                            self.state.send_replace(FundingState::Unavailable);
                            guard.finish(FlightOutcome::Unavailable);
                            Err(e)
                        }
                    };
                }
            }
        }
    }

    /// Join the current flight as a follower, or open a new one as leader.
    fn join_flight(&self) -> Flight<'_> {
        let mut flight = self.flight.lock();
        match &*flight {
            Some(rx) => Flight::Follower(rx.clone()),
            None => {
                let (tx, rx) = watch::channel(None);
                *flight = Some(rx);
                Flight::Leader(FlightGuard {
                    monitor: self,
                    tx: Some(tx),
                })
            }
        }
    }

    async fn read_pair(&self) -> Result<FundingSnapshot> {
        let (raised, cap) = tokio::try_join!(
            self.reader.read_current_cap(),
            self.reader.read_hard_cap()
        )?;
        Ok(FundingSnapshot::new(raised, cap))
    }

    /// Stop the monitor on view teardown. Terminal: later refreshes error
    /// out and in-flight results are dropped.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Poll loop on a fixed interval; returns once the monitor is closed.
    /// Individual failed reads are logged and retried on the next tick.
    pub async fn run(self: Arc<Self>, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if self.is_closed() {
                break;
            }
            match self.refresh().await {
                Err(Error::MonitorClosed) => break,
                Err(e) => debug!(error = %e, "poll refresh failed"),
                Ok(_) => {}
            }
        }
    }
}
