//! Sequence-numbered notice queue with duplicate suppression.
//!
//! A rapid re-render can ask for the same banner twice; posting is therefore
//! idempotent while an identical notice is still visible, and forced
//! re-display is a separate, explicit operation ([`NoticeQueue::repost`])
//! rather than a render-timing trick.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::port::{Notice, NoticeKind, NotifierRegistry};

/// Default auto-dismiss interval for notices.
pub const DEFAULT_DISMISS: Duration = Duration::from_millis(4_500);

struct Inner {
    next_seq: u64,
    entries: VecDeque<Notice>,
}

/// Queue of currently visible notices.
pub struct NoticeQueue {
    dismiss_after: Duration,
    notifiers: NotifierRegistry,
    inner: Mutex<Inner>,
}

impl NoticeQueue {
    #[must_use]
    pub fn new(dismiss_after: Duration) -> Self {
        Self::with_notifiers(dismiss_after, NotifierRegistry::new())
    }

    /// Queue that also broadcasts accepted notices to `notifiers`.
    #[must_use]
    pub fn with_notifiers(dismiss_after: Duration, notifiers: NotifierRegistry) -> Self {
        Self {
            dismiss_after,
            notifiers,
            inner: Mutex::new(Inner {
                next_seq: 0,
                entries: VecDeque::new(),
            }),
        }
    }

    /// Post a notice. Returns its sequence number, or `None` when an
    /// identical notice is still visible (duplicate suppressed).
    pub fn post(&self, kind: NoticeKind, message: impl Into<String>) -> Option<u64> {
        let message = message.into();
        let now = Instant::now();
        let notice = {
            let mut inner = self.inner.lock();
            prune(&mut inner.entries, now, self.dismiss_after);
            let duplicate = inner
                .entries
                .iter()
                .any(|n| n.kind == kind && n.message == message);
            if duplicate {
                return None;
            }
            push(&mut inner, kind, message, now)
        };
        self.notifiers.notify_all(&notice);
        Some(notice.seq)
    }

    /// Post bypassing duplicate suppression. The still-visible identical
    /// notice, if any, is replaced by a fresh one with a new sequence
    /// number, so the display provably re-shows it.
    pub fn repost(&self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        let message = message.into();
        let now = Instant::now();
        let notice = {
            let mut inner = self.inner.lock();
            prune(&mut inner.entries, now, self.dismiss_after);
            inner
                .entries
                .retain(|n| !(n.kind == kind && n.message == message));
            push(&mut inner, kind, message, now)
        };
        self.notifiers.notify_all(&notice);
        notice.seq
    }

    /// Currently visible notices, oldest first. Expired notices are pruned
    /// on the way out.
    #[must_use]
    pub fn active(&self) -> Vec<Notice> {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        prune(&mut inner.entries, now, self.dismiss_after);
        inner.entries.iter().cloned().collect()
    }

    /// Dismiss a notice before its interval elapses. Returns whether it was
    /// still visible.
    pub fn dismiss(&self, seq: u64) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|n| n.seq != seq);
        inner.entries.len() != before
    }

    #[must_use]
    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS)
    }
}

fn prune(entries: &mut VecDeque<Notice>, now: Instant, ttl: Duration) {
    entries.retain(|n| now.duration_since(n.posted_at) < ttl);
}

fn push(inner: &mut Inner, kind: NoticeKind, message: String, now: Instant) -> Notice {
    let notice = Notice {
        seq: inner.next_seq,
        kind,
        message,
        posted_at: now,
    };
    inner.next_seq += 1;
    inner.entries.push_back(notice.clone());
    notice
}
