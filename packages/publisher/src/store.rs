//! HTTP transport to the Popolo bill store.
//!
//! The store speaks a small REST convention:
//!
//! - `GET  {base}/bills/{uid}.json?fields=uid` answers 200 when the bill exists
//! - `POST {base}/bills` creates a bill
//! - `PUT  {base}/bills/{uid}` updates a bill
//!
//! Writes answer with a redirect (302) on success, so the client must not
//! follow redirects.

use async_trait::async_trait;
use parlamento_bills::Bill;
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use crate::config::PublisherConfig;
use crate::error::{PublishError, Result};

/// User agent string identifying this importer.
const USER_AGENT: &str = concat!("parlamento-publisher/", env!("CARGO_PKG_VERSION"));

const BILLS_PATH: &str = "bills";

/// Result of an existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Found,
    NotFound,
}

/// Status and body of a create or update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResponse {
    pub status: u16,
    pub body: String,
}

impl WriteResponse {
    /// The store signals a successful write with a redirect.
    pub fn is_success(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// Trait for bill stores, enabling mocking in tests.
#[async_trait]
pub trait BillStore: Send + Sync {
    async fn exists(&self, uid: &str) -> Result<Existence>;
    async fn create(&self, bill: &Bill) -> Result<WriteResponse>;
    async fn update(&self, bill: &Bill) -> Result<WriteResponse>;
}

/// `reqwest`-backed store client.
pub struct HttpBillStore {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpBillStore {
    pub fn new(config: &PublisherConfig) -> Result<Self> {
        let base_url = Url::parse(&config.store_base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(PublishError::Config(format!(
                "store URL cannot carry paths: {}",
                config.store_base_url
            )));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// `{base}/bills`
    pub fn collection_url(&self) -> Result<Url> {
        self.url_with_segments(&[BILLS_PATH])
    }

    /// `{base}/bills/{uid}`
    pub fn bill_url(&self, uid: &str) -> Result<Url> {
        self.url_with_segments(&[BILLS_PATH, uid])
    }

    /// `{base}/bills/{uid}.json?fields=uid`
    pub fn existence_url(&self, uid: &str) -> Result<Url> {
        let mut url = self.url_with_segments(&[BILLS_PATH, &format!("{uid}.json")])?;
        url.query_pairs_mut().append_pair("fields", "uid");
        Ok(url)
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PublishError::Config(format!("store URL cannot carry paths: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn write_response(response: reqwest::Response) -> WriteResponse {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        WriteResponse { status, body }
    }
}

#[async_trait]
impl BillStore for HttpBillStore {
    async fn exists(&self, uid: &str) -> Result<Existence> {
        let url = self.existence_url(uid)?;
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Server {
                status: status.as_u16(),
                body,
            });
        }

        if status == reqwest::StatusCode::OK {
            Ok(Existence::Found)
        } else {
            debug!(uid, status = status.as_u16(), "bill not in store");
            Ok(Existence::NotFound)
        }
    }

    async fn create(&self, bill: &Bill) -> Result<WriteResponse> {
        let url = self.collection_url()?;
        let response = self.http.post(url).json(bill).send().await?;
        Ok(Self::write_response(response).await)
    }

    async fn update(&self, bill: &Bill) -> Result<WriteResponse> {
        let url = self.bill_url(&bill.uid)?;
        let response = self.http.put(url).json(bill).send().await?;
        Ok(Self::write_response(response).await)
    }
}

/// Test utilities for the store client.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// A request the mock received.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StoreCall {
        Exists(String),
        Create(String),
        Update(String),
    }

    /// Scripted answer to an existence check.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MockExistence {
        Found,
        NotFound,
        ServerError(u16),
    }

    /// In-memory store that records every call.
    ///
    /// Unknown uids are reported as not found; writes answer with
    /// `write_status` (302 unless configured otherwise).
    pub struct MockBillStore {
        existence: HashMap<String, MockExistence>,
        write_status: u16,
        latency: Duration,
        calls: Mutex<Vec<StoreCall>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockBillStore {
        pub fn new() -> Self {
            Self {
                existence: HashMap::new(),
                write_status: 302,
                latency: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        pub fn with_existence(mut self, uid: &str, existence: MockExistence) -> Self {
            self.existence.insert(uid.to_string(), existence);
            self
        }

        pub fn with_write_status(mut self, status: u16) -> Self {
            self.write_status = status;
            self
        }

        /// Delay every call, to observe concurrency.
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub fn calls(&self) -> Vec<StoreCall> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        /// Highest number of calls observed running at the same time.
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        async fn record(&self, call: StoreCall) {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        fn write_response(&self) -> WriteResponse {
            WriteResponse {
                status: self.write_status,
                body: String::new(),
            }
        }
    }

    impl Default for MockBillStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl BillStore for MockBillStore {
        async fn exists(&self, uid: &str) -> Result<Existence> {
            self.record(StoreCall::Exists(uid.to_string())).await;
            match self.existence.get(uid).copied().unwrap_or(MockExistence::NotFound) {
                MockExistence::Found => Ok(Existence::Found),
                MockExistence::NotFound => Ok(Existence::NotFound),
                MockExistence::ServerError(status) => Err(PublishError::Server {
                    status,
                    body: "mock server error".into(),
                }),
            }
        }

        async fn create(&self, bill: &Bill) -> Result<WriteResponse> {
            self.record(StoreCall::Create(bill.uid.clone())).await;
            Ok(self.write_response())
        }

        async fn update(&self, bill: &Bill) -> Result<WriteResponse> {
            self.record(StoreCall::Update(bill.uid.clone())).await;
            Ok(self.write_response())
        }
    }
}
