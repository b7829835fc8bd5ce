//! Error types for assignment operations.

use crate::api::{JobId, WorkerId};
use crate::store::StoreError;

/// Error type for a single assignment attempt.
///
/// These are always surfaced to callers as a failed
/// [`AssignmentResult`](super::executor::AssignmentResult), never panicked;
/// the caller decides whether to retry, pick another strategy, or fall back
/// to manual selection.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    /// No worker passed the hard filters for this job. Terminal for the job
    /// until worker state or configuration changes.
    #[error("no eligible workers for job {job_id}")]
    NoEligibleCandidates { job_id: JobId },

    /// The job was assigned by a concurrent attempt between candidate
    /// selection and commit, or was never unassigned to begin with.
    #[error("job {job_id} is already assigned")]
    AlreadyAssigned { job_id: JobId },

    #[error("job {0} not found")]
    JobNotFound(JobId),

    #[error("worker {0} not found")]
    WorkerNotFound(WorkerId),

    /// Manual strategy re-check failed (inactive worker, workload cap).
    #[error("worker {worker_id} is not eligible: {reason}")]
    IneligibleWorker { worker_id: WorkerId, reason: String },

    #[error("manual strategy requires a worker id")]
    ManualWorkerRequired,

    /// Batch cancellation observed before this job started. The job was not
    /// touched; already-committed assignments are never rolled back.
    #[error("batch cancelled before job {job_id} started")]
    Cancelled { job_id: JobId },

    /// External store failure; the only class worth retrying with unchanged
    /// inputs (when the underlying store error is retryable).
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl AssignmentError {
    /// True when retrying with the same inputs can plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Persistence(e) => e.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_retryable_store_errors_are_retryable() {
        assert!(AssignmentError::Persistence(StoreError::timeout("slow")).is_retryable());
        assert!(!AssignmentError::Persistence(StoreError::conflict("raced")).is_retryable());
        assert!(!AssignmentError::NoEligibleCandidates {
            job_id: JobId::new("j1")
        }
        .is_retryable());
        assert!(!AssignmentError::AlreadyAssigned {
            job_id: JobId::new("j1")
        }
        .is_retryable());
    }
}
