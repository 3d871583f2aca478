//! # Mock Framework & Testing Guide
//!
//! The `MockClient<J>` type hands out a real `WorkerClient<J>` whose requests are
//! answered from a queue of expectations instead of executing jobs. It lets you test
//! code *around* a pool (handlers, domain clients) deterministically and without any
//! network access.
//!
//! ## When to use Mocks vs a Real Pool
//!
//! | Feature | MockClient / create_mock_client | Real WorkerPool |
//! |---------|------------|------------|
//! | **Side effects** | None | Jobs really execute |
//! | **Determinism** | 100% Deterministic | Subject to scheduler |
//! | **Error Injection** | Easy (`return_err`) | Requires a failing dependency |
//! | **Use Case** | Asserting *what* was submitted | Testing the job itself |
//!
//! ## Testing Strategies
//!
//! **Pattern 0: Raw receiver.** [`create_mock_client`] returns the client plus the
//! receiving end of its queue. Await [`expect_fire`] / [`expect_call`] to pull the next
//! request and inspect the job. Best when you need to count submissions exactly.
//!
//! **Pattern 1: Fluent expectations.** [`MockClient`] answers `call`s from queued
//! expectations and records every job it sees.
//!
//! ```rust
//! use worker_framework::mock::MockClient;
//! use worker_framework::{FrameworkError, WorkerJob};
//! use async_trait::async_trait;
//!
//! #[derive(Debug, Clone)] struct Deliver(String);
//! #[derive(Debug, thiserror::Error)] #[error("never")] struct Never;
//!
//! #[async_trait]
//! impl WorkerJob for Deliver {
//!     type Output = u16;
//!     type Context = ();
//!     type Error = Never;
//!     fn kind(&self) -> &'static str { "deliver" }
//!     async fn execute(self, _: &()) -> Result<u16, Never> { Ok(200) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Deliver>::new();
//!     mock.expect_call().return_ok(204);
//!     mock.expect_call().return_err(FrameworkError::PoolClosed);
//!
//!     let client = mock.client();
//!     assert_eq!(client.call(Deliver("a".into())).await.unwrap(), 204);
//!     assert!(client.call(Deliver("b".into())).await.is_err());
//!
//!     mock.verify();
//!     assert_eq!(mock.received().len(), 2);
//! }
//! ```

use crate::client::WorkerClient;
use crate::error::FrameworkError;
use crate::job::WorkerJob;
use crate::message::{JobRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock client.
enum Expectation<J: WorkerJob> {
    Fire,
    Call {
        response: Result<J::Output, FrameworkError>,
    },
}

/// A mock client with expectation tracking for fluent testing.
///
/// Every job that reaches the mock is recorded and can be read back with
/// [`MockClient::received`]. Fired jobs are recorded asynchronously; wait for a
/// later `call` (or use [`create_mock_client`]) before asserting on them.
pub struct MockClient<J: WorkerJob> {
    client: WorkerClient<J>,
    expectations: Arc<Mutex<VecDeque<Expectation<J>>>>,
    received: Arc<Mutex<Vec<J>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<J: WorkerJob + Clone> Default for MockClient<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J: WorkerJob + Clone> MockClient<J> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<JobRequest<J>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let received = Arc::new(Mutex::new(Vec::new()));
        let expectations_clone = expectations.clone();
        let received_clone = received.clone();

        // Spawn background task to answer requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();
                received_clone.lock().unwrap().push(request.job().clone());

                match (request, expectation) {
                    (JobRequest::Fire { .. }, Some(Expectation::Fire)) => {}
                    (JobRequest::Call { respond_to, .. }, Some(Expectation::Call { response })) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: WorkerClient::new(sender),
            expectations,
            received,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> WorkerClient<J> {
        self.client.clone()
    }

    /// Expects a fire-and-forget submission.
    pub fn expect_fire(&mut self) {
        self.expectations.lock().unwrap().push_back(Expectation::Fire);
    }

    /// Expects a `call`.
    pub fn expect_call(&mut self) -> CallExpectationBuilder<J> {
        CallExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Jobs received so far, in arrival order.
    pub fn received(&self) -> Vec<J> {
        self.received.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder for `call` expectations.
pub struct CallExpectationBuilder<J: WorkerJob> {
    expectations: Arc<Mutex<VecDeque<Expectation<J>>>>,
}

impl<J: WorkerJob> CallExpectationBuilder<J> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, output: J::Output) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Call {
                response: Ok(output),
            });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back(Expectation::Call {
                response: Err(error),
            });
    }
}

// =============================================================================
// RAW RECEIVER HELPERS
// =============================================================================

/// Creates a client and the receiver for its queue.
///
/// # Testing Strategy
/// The code under test submits to a queue the test controls. The test pulls requests
/// off the `receiver` and asserts on them, and for `call`s decides the response.
/// Nothing executes unless the test does it.
pub fn create_mock_client<J: WorkerJob>(
    buffer_size: usize,
) -> (WorkerClient<J>, mpsc::Receiver<JobRequest<J>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (WorkerClient::new(sender), receiver)
}

/// Helper to verify that the next message is a fire-and-forget submission.
pub async fn expect_fire<J: WorkerJob>(receiver: &mut mpsc::Receiver<JobRequest<J>>) -> Option<J> {
    match receiver.recv().await {
        Some(JobRequest::Fire { job }) => Some(job),
        _ => None,
    }
}

/// Helper to verify that the next message is a `call`.
pub async fn expect_call<J: WorkerJob>(
    receiver: &mut mpsc::Receiver<JobRequest<J>>,
) -> Option<(J, Response<J::Output>)> {
    match receiver.recv().await {
        Some(JobRequest::Call { job, respond_to }) => Some((job, respond_to)),
        _ => None,
    }
}
