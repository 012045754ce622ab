//! Bounded-concurrency publish queue.
//!
//! Bills are admitted without blocking and dispatched in FIFO order to at
//! most `pool_size` concurrent workers. Completion order across workers is
//! not guaranteed.

use std::sync::Arc;

use parlamento_bills::Bill;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info};

use crate::config::PublisherConfig;
use crate::store::BillStore;
use crate::worker::{publish_bill, PublishOutcome, RetryPolicy};

type Completion = Box<dyn FnOnce(&PublishOutcome) + Send>;

struct PublishTask {
    bill: Bill,
    on_complete: Option<Completion>,
}

/// Per-outcome counters collected while the queue drains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub created: usize,
    pub updated: usize,
    pub dropped: usize,
    pub unexpected_status: usize,
    /// Workers that panicked before producing an outcome.
    pub failed_workers: usize,
}

impl QueueStats {
    fn record(&mut self, result: std::result::Result<PublishOutcome, JoinError>) {
        match result {
            Ok(PublishOutcome::Created) => self.created += 1,
            Ok(PublishOutcome::Updated) => self.updated += 1,
            Ok(PublishOutcome::Dropped { .. }) => self.dropped += 1,
            Ok(PublishOutcome::UnexpectedStatus { .. }) => self.unexpected_status += 1,
            Err(e) => {
                error!(error = %e, "publish worker failed");
                self.failed_workers += 1;
            }
        }
    }

    /// Bills that went through the queue.
    pub fn total(&self) -> usize {
        self.created + self.updated + self.dropped + self.unexpected_status + self.failed_workers
    }
}

/// Queue feeding bills to the store.
///
/// Must be started inside a Tokio runtime.
pub struct PublishQueue {
    tx: mpsc::UnboundedSender<PublishTask>,
    dispatcher: JoinHandle<QueueStats>,
}

impl PublishQueue {
    pub fn start(store: Arc<dyn BillStore>, pool_size: usize, retry: RetryPolicy) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatcher = tokio::spawn(dispatch(rx, store, pool_size.max(1), retry));
        Self { tx, dispatcher }
    }

    pub fn from_config(store: Arc<dyn BillStore>, config: &PublisherConfig) -> Self {
        Self::start(store, config.pool_size, config.retry_policy())
    }

    /// Queue a bill for publishing. Returns immediately.
    pub fn enqueue(&self, bill: Bill) {
        self.submit(PublishTask {
            bill,
            on_complete: None,
        });
    }

    /// Queue a bill and run `on_complete` with its outcome once published.
    pub fn enqueue_with<F>(&self, bill: Bill, on_complete: F)
    where
        F: FnOnce(&PublishOutcome) + Send + 'static,
    {
        self.submit(PublishTask {
            bill,
            on_complete: Some(Box::new(on_complete)),
        });
    }

    fn submit(&self, task: PublishTask) {
        let uid = task.bill.uid.clone();
        match self.tx.send(task) {
            Ok(()) => debug!(uid = %uid, "bill queued"),
            Err(_) => error!(uid = %uid, "publish queue dispatcher is gone, bill not queued"),
        }
    }

    /// Stop accepting bills and wait until every queued bill is handled.
    pub async fn close(self) -> QueueStats {
        let Self { tx, dispatcher } = self;
        drop(tx);

        match dispatcher.await {
            Ok(stats) => {
                info!(
                    created = stats.created,
                    updated = stats.updated,
                    dropped = stats.dropped,
                    unexpected_status = stats.unexpected_status,
                    failed_workers = stats.failed_workers,
                    "publish queue drained"
                );
                stats
            }
            Err(e) => {
                error!(error = %e, "publish queue dispatcher failed");
                QueueStats::default()
            }
        }
    }
}

async fn dispatch(
    mut rx: mpsc::UnboundedReceiver<PublishTask>,
    store: Arc<dyn BillStore>,
    pool_size: usize,
    retry: RetryPolicy,
) -> QueueStats {
    let slots = Arc::new(Semaphore::new(pool_size));
    let mut workers = JoinSet::new();
    let mut stats = QueueStats::default();

    while let Some(task) = rx.recv().await {
        while let Some(result) = workers.try_join_next() {
            stats.record(result);
        }

        let Ok(permit) = Arc::clone(&slots).acquire_owned().await else {
            error!("worker slots closed, stopping dispatch");
            break;
        };
        let store = Arc::clone(&store);

        workers.spawn(async move {
            let _permit = permit;
            let PublishTask { bill, on_complete } = task;
            let outcome = publish_bill(store.as_ref(), &bill, retry).await;
            if let Some(on_complete) = on_complete {
                on_complete(&outcome);
            }
            outcome
        });
    }

    while let Some(result) = workers.join_next().await {
        stats.record(result);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::NaiveDate;
    use parlamento_bills::{classify, ClassifyContext, RawBill};
    use pretty_assertions::assert_eq;

    use crate::store::test_support::{MockBillStore, MockExistence, StoreCall};

    fn bill(uid: &str) -> Bill {
        let raw = RawBill::from_json(&format!(
            r#"{{"file": "{uid}", "type": "PROYECTO DE LEY", "source": "Senado", "creationTime": "10/05/2016"}}"#
        ))
        .unwrap();
        classify(raw, &ClassifyContext::at(NaiveDate::from_ymd_opt(2017, 1, 1).unwrap()))
    }

    #[tokio::test]
    async fn test_queue_publishes_everything() {
        let store = Arc::new(
            MockBillStore::new()
                .with_existence("1-S-2016", MockExistence::Found)
                .with_existence("3-S-2016", MockExistence::ServerError(502)),
        );
        let queue = PublishQueue::start(store.clone(), 2, RetryPolicy::NONE);

        for uid in ["1-S-2016", "2-S-2016", "3-S-2016"] {
            queue.enqueue(bill(uid));
        }
        let stats = queue.close().await;

        assert_eq!(
            stats,
            QueueStats {
                created: 1,
                updated: 1,
                dropped: 1,
                unexpected_status: 0,
                failed_workers: 0,
            }
        );
        assert_eq!(store.calls().len(), 5);
    }

    #[tokio::test]
    async fn test_pool_size_bounds_concurrency() {
        let store = Arc::new(MockBillStore::new().with_latency(Duration::from_millis(20)));
        let queue = PublishQueue::start(store.clone(), 2, RetryPolicy::NONE);

        for i in 0..8 {
            queue.enqueue(bill(&format!("{i}-S-2016")));
        }
        let stats = queue.close().await;

        assert_eq!(stats.created, 8);
        assert!(store.max_in_flight() <= 2);
        assert_eq!(store.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_single_slot_keeps_fifo_order() {
        let store = Arc::new(MockBillStore::new());
        let queue = PublishQueue::start(store.clone(), 1, RetryPolicy::NONE);

        for uid in ["a", "b", "c"] {
            queue.enqueue(bill(uid));
        }
        queue.close().await;

        let existence_checks: Vec<StoreCall> = store
            .calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::Exists(_)))
            .collect();
        assert_eq!(
            existence_checks,
            vec![
                StoreCall::Exists("a".into()),
                StoreCall::Exists("b".into()),
                StoreCall::Exists("c".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_completion_callback_runs_on_drop() {
        let store = Arc::new(MockBillStore::new().with_existence("x", MockExistence::ServerError(500)));
        let queue = PublishQueue::start(store.clone(), 2, RetryPolicy::NONE);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        queue.enqueue_with(bill("x"), move |outcome| {
            sink.lock().unwrap().push(outcome.clone());
        });
        queue.close().await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0], PublishOutcome::Dropped { .. }));
        assert_eq!(store.calls(), vec![StoreCall::Exists("x".into())]);
    }

    #[tokio::test]
    async fn test_same_uid_enqueued_twice_publishes_twice() {
        let store = Arc::new(MockBillStore::new());
        let queue = PublishQueue::start(store.clone(), 2, RetryPolicy::NONE);

        queue.enqueue(bill("dup"));
        queue.enqueue(bill("dup"));
        let stats = queue.close().await;

        assert_eq!(stats.total(), 2);
        assert_eq!(stats.created, 2);
    }
}
