//! # Generic Messages
//!
//! The message types exchanged between a `WorkerClient` and its `WorkerPool`.

use crate::error::FrameworkError;
use crate::job::WorkerJob;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the pool.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the pool.
///
/// - **Fire**: fire-and-forget. The pool runs the job and only logs its outcome.
/// - **Call**: request/response. The pool runs the job and sends the result back.
///
/// Both variants go through the same bounded queue and the same concurrency limit,
/// so a burst of fire-and-forget work cannot starve the process of tasks.
#[derive(Debug)]
pub enum JobRequest<J: WorkerJob> {
    Fire {
        job: J,
    },
    Call {
        job: J,
        respond_to: Response<J::Output>,
    },
}

impl<J: WorkerJob> JobRequest<J> {
    /// The job carried by this request.
    pub fn job(&self) -> &J {
        match self {
            JobRequest::Fire { job } => job,
            JobRequest::Call { job, .. } => job,
        }
    }
}
