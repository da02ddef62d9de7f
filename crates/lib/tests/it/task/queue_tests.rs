use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Notify;
use user_discovery::{
    CancelToken, OperationQueue, Relation, UserDiscoveryOperation,
    task::{Operation, QueueConfig},
    transport::DiscoveryTransport,
};

use crate::helpers::{CallbackLog, MockTransport, response_with, shared_directory, user};

/// Operation that blocks until released, recording the peak concurrency.
struct Gate {
    release: Arc<Notify>,
    running: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

#[async_trait]
impl Operation for Gate {
    type Output = bool;

    async fn run(&mut self, cancel: &CancelToken) -> bool {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::select! {
            _ = self.release.notified() => {}
            _ = cancel.cancelled() => {}
        }
        self.running.fetch_sub(1, Ordering::SeqCst);
        cancel.is_cancelled()
    }
}

#[tokio::test]
async fn test_queue_runs_discovery_task() {
    let directory = shared_directory().await;
    let queue = OperationQueue::default();

    let mut op = UserDiscoveryOperation::by_relation(Relation::follow());
    op.set_requires_overall_count(true).unwrap();
    let log = CallbackLog::default();
    log.attach(&mut op);

    let handle = queue.submit(op.into_task(directory)).unwrap();
    let report = handle.join().await.unwrap();

    assert!(report.outcome.is_success());
    assert_eq!(report.overall_count, Some(2));
    assert_eq!(log.user_ids(), vec!["alice", "bob"]);
    assert_eq!(log.completions(), 1);
}

#[tokio::test]
async fn test_handle_cancel_stops_discovery() {
    let transport: Arc<dyn DiscoveryTransport> = Arc::new(
        MockTransport::replying(response_with(vec![user("u1", "a@x.com")]))
            .with_delay(Duration::from_secs(30)),
    );
    let queue = OperationQueue::default();

    let mut op = UserDiscoveryOperation::by_emails(["a@x.com"]);
    let log = CallbackLog::default();
    log.attach(&mut op);

    let handle = queue.submit(op.into_task(transport)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();

    let report = tokio::time::timeout(Duration::from_secs(5), handle.join())
        .await
        .expect("cancelled task should finish promptly")
        .unwrap();

    assert!(report.outcome.error().is_some_and(|e| e.is_cancelled()));
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn test_queue_limits_concurrency() {
    let queue = OperationQueue::new(QueueConfig { max_concurrent: 2 });
    let release = Arc::new(Notify::new());
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            queue
                .submit(Gate {
                    release: Arc::clone(&release),
                    running: Arc::clone(&running),
                    peak: Arc::clone(&peak),
                })
                .unwrap()
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(running.load(Ordering::SeqCst), 2);
    assert_eq!(queue.available_slots(), 0);

    for handle in &handles {
        handle.cancel();
    }
    for handle in handles {
        assert!(handle.join().await.unwrap());
    }
    assert_eq!(peak.load(Ordering::SeqCst), 2);
    assert_eq!(queue.available_slots(), 2);
}

#[tokio::test]
async fn test_shutdown_rejects_new_operations() {
    let directory = shared_directory().await;
    let queue = OperationQueue::default();
    assert!(queue.is_open());

    queue.shutdown();
    assert!(!queue.is_open());

    let op = UserDiscoveryOperation::by_relation(Relation::friend());
    let err = queue.submit(op.into_task(directory)).unwrap_err();
    assert_eq!(err.module(), "task");
}

#[tokio::test]
async fn test_shutdown_cancels_waiting_operations() {
    let queue = OperationQueue::new(QueueConfig { max_concurrent: 1 });
    let release = Arc::new(Notify::new());
    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let gate = || Gate {
        release: Arc::clone(&release),
        running: Arc::clone(&running),
        peak: Arc::clone(&peak),
    };

    let first = queue.submit(gate()).unwrap();
    let waiting = queue.submit(gate()).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    queue.shutdown();
    // The waiting operation starts already cancelled
    assert!(waiting.join().await.unwrap());

    first.cancel();
    assert!(first.join().await.unwrap());
}

#[tokio::test]
async fn test_shutdown_skips_completion_of_waiting_discovery() {
    let queue = OperationQueue::new(QueueConfig { max_concurrent: 1 });
    let release = Arc::new(Notify::new());
    let blocker = queue
        .submit(Gate {
            release: Arc::clone(&release),
            running: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        })
        .unwrap();

    // Misconfigured, so it would fail validation if it ever ran uncancelled
    let mut op = UserDiscoveryOperation::by_relation(Relation::follow());
    op.set_relation(None).unwrap();
    let log = CallbackLog::default();
    log.attach(&mut op);
    let waiting = queue.submit(op.into_task(shared_directory().await)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    queue.shutdown();
    let report = waiting.join().await.unwrap();

    assert!(report.outcome.error().is_some_and(|e| e.is_cancelled()));
    assert_eq!(log.completions(), 0);

    blocker.cancel();
    assert!(blocker.join().await.unwrap());
}
