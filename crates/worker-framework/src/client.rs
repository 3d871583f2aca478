//! # Generic Client
//!
//! This module defines the generic client for handing jobs to a `WorkerPool`.

use crate::error::FrameworkError;
use crate::job::WorkerJob;
use crate::message::JobRequest;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

/// ## WorkerClient
///
/// The `WorkerClient<J>` is the type-safe interface to a `WorkerPool<J>`.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Two modes** – [`submit`](Self::submit) never waits; [`call`](Self::call) waits for the result.
/// * **Generic** – works with any job that implements `WorkerJob`.
pub struct WorkerClient<J: WorkerJob> {
    sender: mpsc::Sender<JobRequest<J>>,
}

impl<J: WorkerJob> Clone for WorkerClient<J> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<J: WorkerJob> WorkerClient<J> {
    pub fn new(sender: mpsc::Sender<JobRequest<J>>) -> Self {
        Self { sender }
    }

    /// Queues a fire-and-forget job without waiting.
    ///
    /// Fails with [`FrameworkError::QueueFull`] when the pool is saturated and with
    /// [`FrameworkError::PoolClosed`] when it has stopped. The job is dropped in both cases.
    pub fn submit(&self, job: J) -> Result<(), FrameworkError> {
        self.sender
            .try_send(JobRequest::Fire { job })
            .map_err(|e| match e {
                TrySendError::Full(_) => FrameworkError::QueueFull,
                TrySendError::Closed(_) => FrameworkError::PoolClosed,
            })
    }

    /// Queues a job and waits for its output.
    pub async fn call(&self, job: J) -> Result<J::Output, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(JobRequest::Call { job, respond_to })
            .await
            .map_err(|_| FrameworkError::PoolClosed)?;
        response.await.map_err(|_| FrameworkError::WorkerDropped)?
    }
}
