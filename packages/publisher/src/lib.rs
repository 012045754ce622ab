//! Parlamento Publisher - push classified bills to the Popolo store.
//!
//! - [`importer`]: `store(id, data, role, callback)` entry point for the scraper loop
//! - [`queue`]: bounded-concurrency publish queue
//! - [`worker`]: per-bill existence-check-then-write protocol
//! - [`store`]: HTTP store client and the [`store::BillStore`] trait
//! - [`config`]: environment configuration
//! - [`cli`]: command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod importer;
pub mod queue;
pub mod store;
pub mod worker;

pub use config::PublisherConfig;
pub use error::{PublishError, Result};
pub use importer::{BillImporter, BILL_ROLE};
pub use queue::{PublishQueue, QueueStats};
pub use store::{BillStore, Existence, HttpBillStore, WriteResponse};
pub use worker::{publish_bill, PublishOutcome, RetryPolicy};
