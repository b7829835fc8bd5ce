//! Transactional assignment of one job to one worker.
//!
//! The executor owns the commit path: it re-verifies the job is still
//! unassigned immediately before writing, records the worker, confirms the
//! status, and publishes the audit event. The re-check plus the store's
//! compare-and-set give the at-most-one-assignment guarantee even when an
//! interactive request and a bulk batch race on the same job.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::AssignmentError;
use super::timed;
use crate::api::{JobId, WorkerId};
use crate::models::JobStatus;
use crate::store::{AssignmentEvent, BookingStore, NotificationSink, StoreError};
use crate::strategy::Strategy;

/// Outcome of one assignment attempt. Created once per attempt and never
/// mutated after return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub job_id: JobId,
    pub success: bool,
    pub worker_id: Option<WorkerId>,
    /// Weighted total of the winning candidate; absent for manual picks.
    pub score: Option<f64>,
    /// Human-readable explanation of the outcome.
    pub reason: String,
    pub strategy: Strategy,
    pub error: Option<String>,
    /// Whether retrying with unchanged inputs is worthwhile.
    pub retryable: bool,
}

impl AssignmentResult {
    pub fn success(
        job_id: JobId,
        worker_id: WorkerId,
        score: Option<f64>,
        reason: String,
        strategy: Strategy,
    ) -> Self {
        Self {
            job_id,
            success: true,
            worker_id: Some(worker_id),
            score,
            reason,
            strategy,
            error: None,
            retryable: false,
        }
    }

    pub fn failure(job_id: JobId, strategy: Strategy, error: &AssignmentError) -> Self {
        Self {
            job_id,
            success: false,
            worker_id: None,
            score: None,
            reason: error.to_string(),
            strategy,
            error: Some(error.to_string()),
            retryable: error.is_retryable(),
        }
    }
}

/// Commits assignments against the booking store.
pub struct AssignmentExecutor {
    bookings: Arc<dyn BookingStore>,
    sink: Option<Arc<dyn NotificationSink>>,
    store_timeout: Duration,
}

impl AssignmentExecutor {
    pub fn new(bookings: Arc<dyn BookingStore>, store_timeout: Duration) -> Self {
        Self {
            bookings,
            sink: None,
            store_timeout,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Assign `worker_id` to `job_id`.
    ///
    /// Never returns an error: every failure mode is folded into a failed
    /// [`AssignmentResult`] for the caller to act on.
    pub async fn assign(
        &self,
        job_id: &JobId,
        worker_id: &WorkerId,
        score: Option<f64>,
        reason: &str,
        strategy: Strategy,
    ) -> AssignmentResult {
        match self.commit(job_id, worker_id, reason, strategy).await {
            Ok(()) => {
                log::info!("assigned job {} to worker {} ({})", job_id, worker_id, reason);
                AssignmentResult::success(
                    job_id.clone(),
                    worker_id.clone(),
                    score,
                    reason.to_string(),
                    strategy,
                )
            }
            Err(e) => {
                log::warn!("assignment of job {} failed: {}", job_id, e);
                AssignmentResult::failure(job_id.clone(), strategy, &e)
            }
        }
    }

    async fn commit(
        &self,
        job_id: &JobId,
        worker_id: &WorkerId,
        reason: &str,
        strategy: Strategy,
    ) -> Result<(), AssignmentError> {
        // Optimistic check immediately before commit: the candidate was
        // selected from a snapshot that may already be stale.
        let job = timed(self.store_timeout, "get_job", self.bookings.get_job(job_id))
            .await
            .map_err(|e| job_fetch_error(e, job_id))?;

        if !job.is_unassigned() {
            return Err(AssignmentError::AlreadyAssigned {
                job_id: job_id.clone(),
            });
        }

        timed(
            self.store_timeout,
            "set_assigned_worker",
            self.bookings.set_assigned_worker(job_id, worker_id),
        )
        .await
        .map_err(|e| match e {
            // The store's compare-and-set lost a race with a concurrent commit.
            StoreError::Conflict { .. } => AssignmentError::AlreadyAssigned {
                job_id: job_id.clone(),
            },
            other => job_fetch_error(other, job_id),
        })?;

        timed(
            self.store_timeout,
            "set_status",
            self.bookings
                .set_status(job_id, JobStatus::Assigned, Some(reason)),
        )
        .await?;

        // Fire-and-forget: a broken audit sink never fails the assignment.
        if let Some(sink) = &self.sink {
            let event = AssignmentEvent {
                job_id: job_id.clone(),
                worker_id: worker_id.clone(),
                strategy: strategy.name().to_string(),
                reason: reason.to_string(),
                at: Utc::now(),
            };
            if let Err(e) = timed(self.store_timeout, "publish", sink.publish(&event)).await {
                log::warn!("audit publish failed for job {}: {}", job_id, e);
            }
        }

        Ok(())
    }
}

fn job_fetch_error(e: StoreError, job_id: &JobId) -> AssignmentError {
    match e {
        StoreError::NotFound { .. } => AssignmentError::JobNotFound(job_id.clone()),
        other => AssignmentError::Persistence(other),
    }
}
