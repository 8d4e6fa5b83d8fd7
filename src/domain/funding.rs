//! Funding progress: the two on-chain sale counters and the derived
//! percent-complete value.

use alloy_primitives::U256;

use super::WEI_PER_NATIVE;

/// Point-in-time view of the sale counters, in smallest units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingSnapshot {
    /// Amount raised so far (`currentCap`).
    pub raised: U256,
    /// Fundraising ceiling (`hardCap`).
    pub cap: U256,
}

impl FundingSnapshot {
    #[must_use]
    pub const fn new(raised: U256, cap: U256) -> Self {
        Self { raised, cap }
    }

    /// Sale completion as an integer percentage clamped to `0..=100`.
    ///
    /// Computed entirely in U256 so a 256-bit counter never loses precision
    /// through a float. The saturating multiply can only saturate when the
    /// true ratio already exceeds 100, which the clamp absorbs; an
    /// over-subscribed sale (`raised > cap`) clamps the same way.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.cap.is_zero() {
            return 0;
        }
        let scaled = self.raised.saturating_mul(U256::from(100u8)) / self.cap;
        if scaled >= U256::from(100u8) {
            100
        } else {
            scaled.to::<u8>()
        }
    }

    /// Whole tokens raised, for the "tokens sold" readout.
    #[must_use]
    pub fn tokens_sold(&self) -> U256 {
        self.raised / U256::from(WEI_PER_NATIVE)
    }

    /// Whole-token hard cap.
    #[must_use]
    pub fn token_cap(&self) -> U256 {
        self.cap / U256::from(WEI_PER_NATIVE)
    }
}

/// What monitor callers observe between and after reads.
///
/// A display layer renders `Loading`/`Unavailable` as an empty bar with a
/// loading hint; it never receives a fabricated zero snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FundingState {
    /// No read has completed yet.
    #[default]
    Loading,
    Ready(FundingSnapshot),
    /// The last read pair failed; a later refresh replaces this.
    Unavailable,
}

impl FundingState {
    #[must_use]
    pub const fn snapshot(&self) -> Option<FundingSnapshot> {
        match self {
            Self::Ready(snapshot) => Some(*snapshot),
            _ => None,
        }
    }

    /// Percent for display: zero while loading or unavailable.
    #[must_use]
    pub fn percent(&self) -> u8 {
        self.snapshot().map_or(0, |s| s.percent())
    }
}
