//! Integration tests for the notice queue.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use capflow::port::{Notice, NoticeKind, Notifier, NotifierRegistry};
use capflow::service::{NoticeQueue, DEFAULT_DISMISS};

struct CountingNotifier(Arc<AtomicU32>);

impl Notifier for CountingNotifier {
    fn notify(&self, _notice: &Notice) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn sequence_numbers_strictly_increase() {
    let queue = NoticeQueue::default();
    let a = queue.post(NoticeKind::Error, "one").unwrap();
    let b = queue.post(NoticeKind::Error, "two").unwrap();
    let c = queue.post(NoticeKind::Success, "three").unwrap();
    assert!(a < b && b < c);
}

#[tokio::test(start_paused = true)]
async fn duplicate_posts_are_suppressed_while_visible() {
    let queue = NoticeQueue::default();
    assert!(queue.post(NoticeKind::Error, "Insufficient Balance!").is_some());
    assert!(queue.post(NoticeKind::Error, "Insufficient Balance!").is_none());
    assert_eq!(queue.active().len(), 1);

    // same text with a different kind is not a duplicate
    assert!(queue
        .post(NoticeKind::Success, "Insufficient Balance!")
        .is_some());

    // once the original expires, the same notice may post again
    tokio::time::sleep(DEFAULT_DISMISS + Duration::from_millis(1)).await;
    assert!(queue.post(NoticeKind::Error, "Insufficient Balance!").is_some());
}

#[tokio::test(start_paused = true)]
async fn repost_replaces_the_visible_duplicate_with_a_new_identity() {
    let queue = NoticeQueue::default();
    let first = queue.post(NoticeKind::Error, "Insufficient Balance!").unwrap();
    let second = queue.repost(NoticeKind::Error, "Insufficient Balance!");
    assert!(second > first);

    let active = queue.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].seq, second);
}

#[tokio::test(start_paused = true)]
async fn notices_expire_after_the_dismiss_interval() {
    let queue = NoticeQueue::new(Duration::from_millis(4_500));
    queue.post(NoticeKind::Success, "Purchase successful!");

    tokio::time::sleep(Duration::from_millis(4_000)).await;
    assert_eq!(queue.active().len(), 1);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(queue.active().is_empty());
}

#[tokio::test]
async fn dismiss_removes_a_notice_early() {
    let queue = NoticeQueue::default();
    let seq = queue.post(NoticeKind::Error, "oops").unwrap();
    assert!(queue.dismiss(seq));
    assert!(queue.active().is_empty());
    assert!(!queue.dismiss(seq));
}

#[tokio::test]
async fn notifiers_see_accepted_posts_but_not_suppressed_duplicates() {
    let count = Arc::new(AtomicU32::new(0));
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(CountingNotifier(count.clone())));
    let queue = NoticeQueue::with_notifiers(DEFAULT_DISMISS, registry);

    queue.post(NoticeKind::Error, "dup");
    queue.post(NoticeKind::Error, "dup"); // suppressed
    queue.repost(NoticeKind::Error, "dup"); // forced through
    assert_eq!(count.load(Ordering::SeqCst), 2);
}
