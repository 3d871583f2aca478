//! # Generic Worker Pool
//!
//! This module defines the `WorkerPool`, the server side of the framework. It owns the
//! receiving end of a bounded queue and executes jobs with a bounded number of
//! concurrent tasks.

use crate::client::WorkerClient;
use crate::error::FrameworkError;
use crate::job::WorkerJob;
use crate::message::JobRequest;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// The generic pool that executes jobs of type `J`.
///
/// # Architecture Note
/// This struct is the "Server" half of the pool. It owns the receiver end of the
/// channel and the concurrency budget. Clients only hold a sender.
///
/// **Backpressure**:
/// The queue holds at most `buffer_size` pending requests and at most `concurrency`
/// jobs execute at once. While every permit is taken the pool stops draining the
/// queue, so [`WorkerClient::submit`] starts failing with
/// [`FrameworkError::QueueFull`] instead of buffering without bound.
///
/// **Shutdown**:
/// When every client is dropped the queue closes. The pool still executes whatever
/// was queued, then waits for all in-flight jobs before `run` returns. Awaiting the
/// pool's task handle is therefore enough to know no fire-and-forget job is lost.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `WorkerPool::new()` to get the `pool` (server) and `client` (interface).
/// 2.  **Wire**: Pass the shared dependencies into `pool.run(context)`.
/// 3.  **Run**: Spawn the run loop in a background task.
///
/// ```rust
/// use worker_framework::{WorkerJob, WorkerPool};
/// use async_trait::async_trait;
///
/// #[derive(Debug)] struct Double(u32);
/// #[derive(Debug, thiserror::Error)] #[error("never")] struct Never;
///
/// #[async_trait]
/// impl WorkerJob for Double {
///     type Output = u32;
///     type Context = ();
///     type Error = Never;
///     fn kind(&self) -> &'static str { "double" }
///     async fn execute(self, _: &()) -> Result<u32, Never> { Ok(self.0 * 2) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (pool, client) = WorkerPool::<Double>::new(10, 2);
///     tokio::spawn(pool.run(()));
///     assert_eq!(client.call(Double(21)).await.unwrap(), 42);
/// }
/// ```
pub struct WorkerPool<J: WorkerJob> {
    receiver: mpsc::Receiver<JobRequest<J>>,
    concurrency: usize,
}

impl<J: WorkerJob> WorkerPool<J> {
    /// Creates a new `WorkerPool` and its associated `WorkerClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Capacity of the request queue.
    /// * `concurrency` - Maximum number of jobs executing at once (at least 1).
    pub fn new(buffer_size: usize, concurrency: usize) -> (Self, WorkerClient<J>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let pool = Self {
            receiver,
            concurrency: concurrency.max(1),
        };
        (pool, WorkerClient::new(sender))
    }

    /// Runs the pool's event loop until the queue closes and every job has finished.
    ///
    /// # Context Injection
    /// The `context` is shared (behind an `Arc`) by every job this pool executes.
    pub async fn run(mut self, context: J::Context) {
        // Extract just the type name (e.g., "PublishJob" instead of the full path)
        let job_type = std::any::type_name::<J>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(job_type, concurrency = self.concurrency, "Worker pool started");

        let context = Arc::new(context);
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut in_flight = JoinSet::new();
        let mut completed: u64 = 0;

        while let Some(request) = self.receiver.recv().await {
            while let Some(joined) = in_flight.try_join_next() {
                completed += reap(job_type, joined);
            }

            let permit = match permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let ctx = Arc::clone(&context);
            in_flight.spawn(async move {
                let _permit = permit;
                process(job_type, request, &ctx).await;
            });
        }

        debug!(job_type, pending = in_flight.len(), "Queue closed, draining");
        while let Some(joined) = in_flight.join_next().await {
            completed += reap(job_type, joined);
        }

        info!(job_type, completed, "Shutdown");
    }
}

fn reap(job_type: &str, joined: Result<(), tokio::task::JoinError>) -> u64 {
    match joined {
        Ok(()) => 1,
        Err(e) => {
            error!(job_type, error = %e, "Job task panicked");
            0
        }
    }
}

async fn process<J: WorkerJob>(job_type: &'static str, request: JobRequest<J>, ctx: &J::Context) {
    match request {
        JobRequest::Fire { job } => {
            let kind = job.kind();
            debug!(job_type, kind, ?job, "Fire");
            match job.execute(ctx).await {
                Ok(output) => info!(job_type, kind, ?output, "Job ok"),
                Err(e) => warn!(job_type, kind, error = %e, "Job failed"),
            }
        }
        JobRequest::Call { job, respond_to } => {
            let kind = job.kind();
            debug!(job_type, kind, ?job, "Call");
            let result = job
                .execute(ctx)
                .await
                .map_err(|e| FrameworkError::JobError(Box::new(e)));
            match &result {
                Ok(_) => info!(job_type, kind, "Job ok"),
                Err(e) => warn!(job_type, kind, error = %e, "Job failed"),
            }
            let _ = respond_to.send(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Counters {
        executed: AtomicUsize,
        running: AtomicUsize,
        peak: AtomicUsize,
    }

    #[derive(Debug)]
    enum TestJob {
        Echo(u32),
        Fail,
        Sleep(Duration),
    }

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("test job failed")]
    struct TestError;

    #[async_trait]
    impl WorkerJob for TestJob {
        type Output = u32;
        type Context = Arc<Counters>;
        type Error = TestError;

        fn kind(&self) -> &'static str {
            "test"
        }

        async fn execute(self, ctx: &Arc<Counters>) -> Result<u32, TestError> {
            let running = ctx.running.fetch_add(1, Ordering::SeqCst) + 1;
            ctx.peak.fetch_max(running, Ordering::SeqCst);
            let result = match self {
                TestJob::Echo(n) => Ok(n),
                TestJob::Fail => Err(TestError),
                TestJob::Sleep(d) => {
                    tokio::time::sleep(d).await;
                    Ok(0)
                }
            };
            ctx.running.fetch_sub(1, Ordering::SeqCst);
            ctx.executed.fetch_add(1, Ordering::SeqCst);
            result
        }
    }

    #[tokio::test]
    async fn test_call_returns_job_output() {
        let counters = Arc::new(Counters::default());
        let (pool, client) = WorkerPool::<TestJob>::new(8, 2);
        let handle = tokio::spawn(pool.run(counters.clone()));

        assert_eq!(client.call(TestJob::Echo(7)).await.unwrap(), 7);

        drop(client);
        handle.await.unwrap();
        assert_eq!(counters.executed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_call_surfaces_job_error() {
        let (pool, client) = WorkerPool::<TestJob>::new(8, 2);
        tokio::spawn(pool.run(Arc::new(Counters::default())));

        let err = client.call(TestJob::Fail).await.unwrap_err();
        assert_eq!(err.job_error::<TestError>(), Some(&TestError));
    }

    #[tokio::test]
    async fn test_shutdown_drains_fired_jobs() {
        let counters = Arc::new(Counters::default());
        let (pool, client) = WorkerPool::<TestJob>::new(16, 4);
        let handle = tokio::spawn(pool.run(counters.clone()));

        for n in 0..10 {
            client.submit(TestJob::Echo(n)).unwrap();
        }
        client.submit(TestJob::Fail).unwrap();

        // Dropping the last client closes the queue; run() returns only after draining.
        drop(client);
        handle.await.unwrap();
        assert_eq!(counters.executed.load(Ordering::SeqCst), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let counters = Arc::new(Counters::default());
        let (pool, client) = WorkerPool::<TestJob>::new(16, 2);
        let handle = tokio::spawn(pool.run(counters.clone()));

        for _ in 0..6 {
            client
                .submit(TestJob::Sleep(Duration::from_millis(100)))
                .unwrap();
        }
        drop(client);
        handle.await.unwrap();

        assert_eq!(counters.executed.load(Ordering::SeqCst), 6);
        assert_eq!(counters.peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_submit_reports_full_queue() {
        // Pool never runs, so nothing drains the single queue slot.
        let (_pool, client) = WorkerPool::<TestJob>::new(1, 1);

        client.submit(TestJob::Echo(1)).unwrap();
        let err = client.submit(TestJob::Echo(2)).unwrap_err();
        assert!(matches!(err, FrameworkError::QueueFull));
    }

    #[tokio::test]
    async fn test_submit_after_pool_stopped() {
        let (pool, client) = WorkerPool::<TestJob>::new(4, 1);
        drop(pool);

        let err = client.submit(TestJob::Echo(1)).unwrap_err();
        assert!(matches!(err, FrameworkError::PoolClosed));
        let err = client.call(TestJob::Echo(1)).await.unwrap_err();
        assert!(matches!(err, FrameworkError::PoolClosed));
    }
}
