//! External collaborator traits.
//!
//! The engine consumes four narrow interfaces: the booking store (jobs), the
//! employee directory (workers and workload), a distance provider, and a
//! fire-and-forget notification sink. Anything satisfying these traits can
//! back the engine; the in-memory implementations in [`super::local`] are the
//! reference backend.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::StoreResult;
use crate::api::{JobId, WorkerId};
use crate::models::{GeoPoint, Job, JobStatus, TimeWindow, Worker};

/// Store of jobs awaiting (or holding) assignments.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// List jobs currently in `unassigned` status.
    async fn list_unassigned_jobs(&self) -> StoreResult<Vec<Job>>;

    /// Fetch a single job by id.
    ///
    /// # Returns
    /// * `Ok(Job)` - The job snapshot
    /// * `Err(StoreError::NotFound)` - If no such job exists
    async fn get_job(&self, job_id: &JobId) -> StoreResult<Job>;

    /// Record the chosen worker on a job.
    ///
    /// Implementations must reject the write when the job is no longer
    /// `unassigned`, returning `StoreError::Conflict`; this is the
    /// compare-and-set backing the at-most-one-assignment guarantee.
    async fn set_assigned_worker(&self, job_id: &JobId, worker_id: &WorkerId) -> StoreResult<()>;

    /// Update a job's lifecycle status, with an optional audit note.
    async fn set_status(
        &self,
        job_id: &JobId,
        status: JobStatus,
        note: Option<&str>,
    ) -> StoreResult<()>;
}

/// Directory of candidate workers.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// List workers with `active == true`, optionally restricted to those
    /// holding an expertise tag.
    async fn list_active_workers(&self, expertise: Option<&str>) -> StoreResult<Vec<Worker>>;

    /// Fetch a single worker by id.
    async fn get_worker(&self, worker_id: &WorkerId) -> StoreResult<Worker>;

    /// Number of assignments the worker already holds for the given day.
    async fn current_workload(&self, worker_id: &WorkerId, date: NaiveDate) -> StoreResult<u32>;

    /// Time windows the worker is already committed to on the given day.
    /// Used to detect scheduling conflicts.
    async fn committed_windows(
        &self,
        worker_id: &WorkerId,
        date: NaiveDate,
    ) -> StoreResult<Vec<TimeWindow>>;
}

/// Opaque distance metric between two locations.
///
/// The engine never interprets coordinates; any numeric source (haversine,
/// road network, precomputed matrix) satisfies this trait.
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn distance_km(&self, from: &GeoPoint, to: &GeoPoint) -> StoreResult<f64>;
}

/// Audit record published after a committed assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentEvent {
    pub job_id: JobId,
    pub worker_id: WorkerId,
    pub strategy: String,
    /// Human-readable explanation of why this worker won.
    pub reason: String,
    pub at: DateTime<Utc>,
}

/// Fire-and-forget audit sink.
///
/// Publish failures are logged by the engine and never propagated; a broken
/// sink must not fail an otherwise committed assignment.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: &AssignmentEvent) -> StoreResult<()>;
}
