//! # Framework Errors
//!
//! Common error types used by the pool and its clients. Job-specific failures are
//! boxed into [`FrameworkError::JobError`] so callers can still downcast them.

/// Errors that can occur within the worker framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Worker pool closed")]
    PoolClosed,
    #[error("Worker queue full")]
    QueueFull,
    #[error("Worker dropped response channel")]
    WorkerDropped,
    #[error("Job error: {0}")]
    JobError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Returns the job's own error when this is a [`FrameworkError::JobError`] of type `E`.
    pub fn job_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            FrameworkError::JobError(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn job_error_downcasts_to_the_original_type() {
        let err = FrameworkError::JobError(Box::new(Boom));
        assert_eq!(err.job_error::<Boom>(), Some(&Boom));
        assert!(FrameworkError::QueueFull.job_error::<Boom>().is_none());
    }
}
