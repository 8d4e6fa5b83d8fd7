//! Integration tests for the purchase submission state machine.

use std::sync::Arc;

use capflow::domain::TransactionOutcome;
use capflow::port::NoticeKind;
use capflow::service::{FundingMonitor, NoticeQueue, PurchaseSubmitter, SubmitPhase};
use capflow::testkit::domain::{ether, one_token};
use capflow::testkit::sale::{FixedSaleReader, ScriptedGateway};
use tokio::sync::Semaphore;

struct Harness {
    reader: Arc<FixedSaleReader>,
    monitor: Arc<FundingMonitor>,
    notices: Arc<NoticeQueue>,
    submitter: PurchaseSubmitter,
}

fn harness(gateway: ScriptedGateway) -> Harness {
    let reader = Arc::new(FixedSaleReader::new(ether(5), ether(15)));
    let monitor = Arc::new(FundingMonitor::new(reader.clone()));
    let notices = Arc::new(NoticeQueue::default());
    let submitter = PurchaseSubmitter::new(
        Arc::new(gateway),
        monitor.clone(),
        notices.clone(),
    );
    Harness {
        reader,
        monitor,
        notices,
        submitter,
    }
}

#[tokio::test]
async fn successful_purchase_refreshes_funding_exactly_once() {
    let h = harness(ScriptedGateway::new());

    let outcome = h.submitter.submit(one_token()).await;
    assert!(outcome.is_succeeded());

    // exactly one refresh - not zero, not two
    assert_eq!(h.reader.current_cap_calls(), 1);
    assert_eq!(h.reader.hard_cap_calls(), 1);
    assert!(h.monitor.current().snapshot().is_some());

    let active = h.notices.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, NoticeKind::Success);
    assert_eq!(active[0].message, "Purchase successful!");

    assert!(matches!(h.submitter.phase(), SubmitPhase::Succeeded { .. }));
}

#[tokio::test]
async fn failed_purchase_posts_a_sanitized_error_notice() {
    let gateway = ScriptedGateway::new().with_submit_results(vec![Ok(
        TransactionOutcome::Failed("execution reverted: cap exceeded\n    at eth_call".into()),
    )]);
    let h = harness(gateway);

    let outcome = h.submitter.submit(one_token()).await;
    assert_eq!(
        outcome,
        TransactionOutcome::Failed("execution reverted: cap exceeded".into())
    );

    // a failure must not refresh the funding state
    assert_eq!(h.reader.current_cap_calls(), 0);

    let active = h.notices.active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].kind, NoticeKind::Error);
    assert_eq!(active[0].message, "execution reverted: cap exceeded");
}

#[tokio::test]
async fn wallet_rejection_becomes_the_friendly_message() {
    let gateway = ScriptedGateway::new().with_submit_results(vec![Ok(
        TransactionOutcome::Failed("User rejected the request.".into()),
    )]);
    let h = harness(gateway);

    let outcome = h.submitter.submit(one_token()).await;
    assert_eq!(
        outcome,
        TransactionOutcome::Failed("Transaction rejected in your wallet.".into())
    );
}

#[tokio::test(flavor = "current_thread")]
async fn resubmit_while_pending_does_not_reach_the_gateway() {
    let gate = Arc::new(Semaphore::new(0));
    let gateway = Arc::new(ScriptedGateway::new().with_gate(gate.clone()));
    let reader = Arc::new(FixedSaleReader::new(ether(5), ether(15)));
    let monitor = Arc::new(FundingMonitor::new(reader));
    let notices = Arc::new(NoticeQueue::default());
    let submitter = Arc::new(PurchaseSubmitter::new(
        gateway.clone(),
        monitor,
        notices,
    ));

    let first = {
        let submitter = submitter.clone();
        tokio::spawn(async move { submitter.submit(one_token()).await })
    };
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    assert_eq!(submitter.phase(), SubmitPhase::Pending);
    let second = submitter.submit(one_token()).await;
    assert!(second.is_pending());
    assert_eq!(gateway.submit_calls(), 1);

    gate.add_permits(1);
    assert!(first.await.unwrap().is_succeeded());
}

#[tokio::test]
async fn settled_machine_replays_its_outcome_until_rearmed() {
    let gateway = ScriptedGateway::new()
        .with_submit_results(vec![Ok(TransactionOutcome::Failed("no deal".into()))]);
    let h = harness(gateway);

    let first = h.submitter.submit(one_token()).await;
    assert_eq!(first, TransactionOutcome::Failed("no deal".into()));

    // still settled: the gateway is not called again
    let replay = h.submitter.submit(one_token()).await;
    assert_eq!(replay, first);

    // the user edits the amount field
    h.submitter.rearm();
    assert_eq!(h.submitter.phase(), SubmitPhase::Idle);

    let retry = h.submitter.submit(one_token()).await;
    assert!(retry.is_succeeded());
}

#[tokio::test(flavor = "current_thread")]
async fn cancelled_submission_returns_the_machine_to_idle() {
    let gate = Arc::new(Semaphore::new(0));
    let gateway = Arc::new(ScriptedGateway::new().with_gate(gate.clone()));
    let reader = Arc::new(FixedSaleReader::new(ether(5), ether(15)));
    let monitor = Arc::new(FundingMonitor::new(reader));
    let notices = Arc::new(NoticeQueue::default());
    let submitter = Arc::new(PurchaseSubmitter::new(
        gateway.clone(),
        monitor,
        notices,
    ));

    let first = {
        let submitter = submitter.clone();
        tokio::spawn(async move { submitter.submit(one_token()).await })
    };
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    assert_eq!(submitter.phase(), SubmitPhase::Pending);

    // the submitting task is dropped mid-call
    first.abort();
    let _ = first.await;

    // the machine must not stay pending behind a submission that no
    // longer exists
    assert_eq!(submitter.phase(), SubmitPhase::Idle);

    gate.add_permits(1);
    let retry = submitter.submit(one_token()).await;
    assert!(retry.is_succeeded());
    assert_eq!(gateway.submit_calls(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn teardown_drops_an_in_flight_result() {
    let gate = Arc::new(Semaphore::new(0));
    let gateway = Arc::new(ScriptedGateway::new().with_gate(gate.clone()));
    let reader = Arc::new(FixedSaleReader::new(ether(5), ether(15)));
    let monitor = Arc::new(FundingMonitor::new(reader.clone()));
    let notices = Arc::new(NoticeQueue::default());
    let submitter = Arc::new(PurchaseSubmitter::new(
        gateway,
        monitor,
        notices.clone(),
    ));

    let task = {
        let submitter = submitter.clone();
        tokio::spawn(async move { submitter.submit(one_token()).await })
    };
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    submitter.close();
    gate.add_permits(1);

    // the late success is dropped: no refresh, no notice, no transition
    assert!(task.await.unwrap().is_pending());
    assert_eq!(reader.current_cap_calls(), 0);
    assert!(notices.active().is_empty());
}
