//! Notifier port for user-facing notices.
//!
//! The queue in [`service`](crate::service) assigns every accepted notice a
//! strictly increasing sequence number, so observers (and the display layer)
//! can tell a genuinely new notice from a stale re-render of an old one.

use tokio::time::Instant;
use tracing::{info, warn};

/// Notice severity; the presentation layer maps this to banner styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A single user-facing notice with an explicit identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub seq: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub posted_at: Instant,
}

/// Trait for notification handlers.
///
/// Implementations receive every notice the queue accepts (suppressed
/// duplicates never reach them). Fire-and-forget: `notify` must return
/// quickly and spawn a task for anything slow.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts accepted notices to all registered notifiers.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, notice: &Notice) {
        for notifier in &self.notifiers {
            notifier.notify(notice);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notice: &Notice) {}
}

/// A logging notifier that records notices via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success => {
                info!(seq = notice.seq, message = %notice.message, "notice posted");
            }
            NoticeKind::Error => {
                warn!(seq = notice.seq, message = %notice.message, "error notice posted");
            }
        }
    }
}
