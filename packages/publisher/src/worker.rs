//! Per-bill publish protocol.
//!
//! One bill is published with an existence check followed by either an
//! update or a create. Every path ends in a [`PublishOutcome`]; nothing is
//! re-queued.

use std::future::Future;
use std::time::Duration;

use parlamento_bills::Bill;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::store::{BillStore, Existence, WriteResponse};

/// Terminal result of publishing one bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Created,
    Updated,
    /// The store could not be reached or failed; the bill was not written.
    Dropped { reason: String },
    /// The write went through but did not answer with a redirect.
    UnexpectedStatus { status: u16, body: String },
}

/// Bounded retry for transient store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        base_delay: Duration::ZERO,
    };

    /// Delay before retry number `attempt` (zero-based), doubling each time.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1 << attempt.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Publish one bill: existence check, then update or create.
#[tracing::instrument(skip(store, bill, retry), fields(uid = %bill.uid, stage = %bill.stage))]
pub async fn publish_bill(store: &dyn BillStore, bill: &Bill, retry: RetryPolicy) -> PublishOutcome {
    let existence = match with_retry(retry, "existence check", || store.exists(&bill.uid), |r| {
        matches!(r, Err(e) if e.is_transient())
    })
    .await
    {
        Ok(existence) => existence,
        Err(e) => {
            error!(error = %e, "existence check failed, dropping bill");
            return PublishOutcome::Dropped {
                reason: e.to_string(),
            };
        }
    };

    let written = match existence {
        Existence::Found => with_retry(retry, "update", || store.update(bill), write_retryable).await,
        Existence::NotFound => with_retry(retry, "create", || store.create(bill), write_retryable).await,
    };

    match written {
        Ok(response) if response.is_success() => {
            info!(status = response.status, ?existence, "bill published");
            match existence {
                Existence::Found => PublishOutcome::Updated,
                Existence::NotFound => PublishOutcome::Created,
            }
        }
        Ok(WriteResponse { status, body }) => {
            error!(status, body = %body, ?existence, "store rejected bill");
            PublishOutcome::UnexpectedStatus { status, body }
        }
        Err(e) => {
            error!(error = %e, ?existence, "bill write failed, dropping bill");
            PublishOutcome::Dropped {
                reason: e.to_string(),
            }
        }
    }
}

fn write_retryable(result: &Result<WriteResponse>) -> bool {
    match result {
        Ok(response) => response.is_server_error(),
        Err(e) => e.is_transient(),
    }
}

/// Run `call` until it succeeds, the policy is exhausted, or `retryable` says stop.
async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    operation: &str,
    mut call: F,
    retryable: impl Fn(&Result<T>) -> bool,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        let result = call().await;
        if attempt >= policy.max_retries || !retryable(&result) {
            return result;
        }

        let delay = policy.delay_for(attempt);
        attempt += 1;
        warn!(
            operation,
            attempt,
            max_retries = policy.max_retries,
            delay_ms = delay.as_millis() as u64,
            "transient store failure, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{MockBillStore, MockExistence, StoreCall};
    use chrono::NaiveDate;
    use parlamento_bills::{classify, ClassifyContext, RawBill};
    use pretty_assertions::assert_eq;

    fn bill(uid: &str) -> Bill {
        let raw = RawBill::from_json(&format!(
            r#"{{"file": "{uid}", "type": "PROYECTO DE LEY", "source": "Diputados", "creationTime": "10/05/2016"}}"#
        ))
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        classify(raw, &ClassifyContext::at(today))
    }

    #[tokio::test]
    async fn test_existing_bill_is_updated() {
        let store = MockBillStore::new().with_existence("1-D-2016", MockExistence::Found);
        let outcome = publish_bill(&store, &bill("1-D-2016"), RetryPolicy::NONE).await;

        assert_eq!(outcome, PublishOutcome::Updated);
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Exists("1-D-2016".into()),
                StoreCall::Update("1-D-2016".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_bill_is_created() {
        let store = MockBillStore::new();
        let outcome = publish_bill(&store, &bill("2-D-2016"), RetryPolicy::NONE).await;

        assert_eq!(outcome, PublishOutcome::Created);
        assert_eq!(
            store.calls(),
            vec![
                StoreCall::Exists("2-D-2016".into()),
                StoreCall::Create("2-D-2016".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_server_error_drops_without_retry() {
        let store = MockBillStore::new().with_existence("3-D-2016", MockExistence::ServerError(500));
        let outcome = publish_bill(&store, &bill("3-D-2016"), RetryPolicy::NONE).await;

        assert!(matches!(outcome, PublishOutcome::Dropped { .. }));
        assert_eq!(store.calls(), vec![StoreCall::Exists("3-D-2016".into())]);
    }

    #[tokio::test]
    async fn test_server_error_retried_when_enabled() {
        let store = MockBillStore::new().with_existence("4-D-2016", MockExistence::ServerError(503));
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
        };
        let outcome = publish_bill(&store, &bill("4-D-2016"), policy).await;

        assert!(matches!(outcome, PublishOutcome::Dropped { .. }));
        assert_eq!(store.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_non_redirect_write_is_reported() {
        let store = MockBillStore::new().with_write_status(200);
        let outcome = publish_bill(&store, &bill("5-D-2016"), RetryPolicy::NONE).await;

        assert_eq!(
            outcome,
            PublishOutcome::UnexpectedStatus {
                status: 200,
                body: String::new()
            }
        );
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    }
}
