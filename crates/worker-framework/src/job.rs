//! # WorkerJob Trait
//!
//! The `WorkerJob` trait defines the contract that every unit of background work
//! (a sidecar publish, a monitoring forward, ...) must implement to be executed by the
//! generic `WorkerPool`. It specifies associated types for the output, the shared
//! execution context and the error, and a single async `execute` hook.
//!
//! # Architecture Note
//! By defining one contract for all jobs we write the pool's queueing, concurrency
//! limiting and logging *once* and reuse it for every kind of outbound call.
//!
//! The associated `Context` is the "Late Binding" seam: the pool receives it in
//! `run()`, not in `new()`, so a job type never owns its HTTP client or config.

use async_trait::async_trait;
use std::fmt::Debug;

/// Trait that any background job must implement to be executed by a `WorkerPool`.
///
/// # Async & Context
/// This trait is `#[async_trait]` so jobs can await outbound I/O. The pool shares one
/// `Context` between all concurrently running jobs, hence the `Sync` bound.
#[async_trait]
pub trait WorkerJob: Send + Debug + 'static {
    /// The value returned to callers that wait for the job (`WorkerClient::call`).
    type Output: Send + Debug + 'static;

    /// The runtime context (dependencies) shared by every job of this type.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync + 'static;

    /// The error type for this job.
    ///
    /// # Design Note: Error Granularity
    ///
    /// One error enum per job type, not per failure site. Fire-and-forget callers never
    /// see it (the pool logs it); waiting callers get it wrapped in
    /// [`FrameworkError::JobError`](crate::FrameworkError::JobError).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short, stable label used as the `job` field in pool logs (e.g. `"publish"`).
    fn kind(&self) -> &'static str;

    /// Executes the job against the shared context.
    async fn execute(self, ctx: &Self::Context) -> Result<Self::Output, Self::Error>;
}
