//! # JobClient Trait
//!
//! Provides a common interface for domain-specific clients, adding default `fire` and
//! `call` methods built on top of a generic `WorkerClient`.
use crate::{FrameworkError, WorkerClient, WorkerJob};
use async_trait::async_trait;

/// Trait for domain clients that wrap a `WorkerClient`.
///
/// Implementors only say how to reach the inner client and how to translate
/// framework errors; `fire` and `call` come for free and are traced.
///
/// # Example
///
/// ```rust
/// use worker_framework::{FrameworkError, JobClient, WorkerClient, WorkerJob};
/// use async_trait::async_trait;
///
/// #[derive(Debug)] struct Ping;
/// #[derive(Debug, thiserror::Error)] #[error("never")] struct Never;
///
/// #[async_trait]
/// impl WorkerJob for Ping {
///     type Output = ();
///     type Context = ();
///     type Error = Never;
///     fn kind(&self) -> &'static str { "ping" }
///     async fn execute(self, _: &()) -> Result<(), Never> { Ok(()) }
/// }
///
/// struct PingClient { inner: WorkerClient<Ping> }
///
/// #[async_trait]
/// impl JobClient<Ping> for PingClient {
///     type Error = String;
///     fn inner(&self) -> &WorkerClient<Ping> { &self.inner }
///     fn map_error(e: FrameworkError) -> String { e.to_string() }
/// }
/// ```
#[async_trait]
pub trait JobClient<J: WorkerJob>: Send + Sync {
    /// The domain-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic WorkerClient.
    fn inner(&self) -> &WorkerClient<J>;

    /// Map framework errors to the domain error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Queue a job without waiting for it.
    #[tracing::instrument(skip(self))]
    fn fire(&self, job: J) -> Result<(), Self::Error> {
        tracing::debug!("Submitting job");
        self.inner().submit(job).map_err(Self::map_error)
    }

    /// Queue a job and wait for its output.
    #[tracing::instrument(skip(self))]
    async fn call(&self, job: J) -> Result<J::Output, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().call(job).await.map_err(Self::map_error)
    }
}
