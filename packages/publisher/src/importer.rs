//! Entry point the scraper loop hands records to.

use chrono::NaiveDate;
use parlamento_bills::{classify, ClassifyContext, RawBill};
use tracing::debug;

use crate::queue::{PublishQueue, QueueStats};

/// Record role carried by bills. Other importers share the loop with
/// committees, people, votes and events.
pub const BILL_ROLE: &str = "bill";

/// Classifies scraped bills and hands them to the publish queue.
pub struct BillImporter {
    queue: PublishQueue,
    today: Option<NaiveDate>,
}

impl BillImporter {
    pub fn new(queue: PublishQueue) -> Self {
        Self { queue, today: None }
    }

    /// Pin the date used for parliamentary-period expiry.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Store one scraped record.
    ///
    /// `callback` runs once the bill is queued, not once it is published, so
    /// the caller can move on to the next page straight away.
    pub fn store<F>(&self, id: &str, data: RawBill, role: &str, callback: F)
    where
        F: FnOnce(),
    {
        if role != BILL_ROLE {
            debug!(id, role, "not a bill, skipping");
            callback();
            return;
        }

        let bill = classify(data, &self.context());
        debug!(id, uid = %bill.uid, stage = %bill.stage, "bill classified");
        self.queue.enqueue(bill);
        callback();
    }

    /// Wait for every stored bill to be published.
    pub async fn finish(self) -> QueueStats {
        self.queue.close().await
    }

    fn context(&self) -> ClassifyContext {
        match self.today {
            Some(today) => ClassifyContext::at(today),
            None => ClassifyContext::today(),
        }
    }
}
