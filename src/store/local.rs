//! In-memory store implementations.
//!
//! These back the engine in tests and local development, and double as the
//! reference semantics for real backends: the booking store enforces the
//! compare-and-set on assignment, the directory answers workload and
//! commitment queries per calendar day.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};

use super::error::{ErrorContext, StoreError, StoreResult};
use super::traits::{
    AssignmentEvent, BookingStore, DistanceProvider, EmployeeDirectory, NotificationSink,
};
use crate::api::{JobId, WorkerId};
use crate::models::{GeoPoint, Job, JobStatus, TimeWindow, Worker};

/// Mean Earth radius, kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

// ==================== Booking store ====================

/// In-memory booking store keyed by job id.
#[derive(Default)]
pub struct LocalBookingStore {
    jobs: RwLock<BTreeMap<String, Job>>,
}

impl LocalBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the store contents with the given jobs.
    pub fn seed(&self, jobs: Vec<Job>) {
        let mut map = self.jobs.write();
        map.clear();
        for job in jobs {
            map.insert(job.id.as_str().to_string(), job);
        }
    }

    pub fn insert_job(&self, job: Job) {
        self.jobs.write().insert(job.id.as_str().to_string(), job);
    }

    /// Snapshot a job for inspection in tests and tooling.
    pub fn job(&self, job_id: &JobId) -> Option<Job> {
        self.jobs.read().get(job_id.as_str()).cloned()
    }
}

#[async_trait]
impl BookingStore for LocalBookingStore {
    async fn list_unassigned_jobs(&self) -> StoreResult<Vec<Job>> {
        Ok(self
            .jobs
            .read()
            .values()
            .filter(|j| j.is_unassigned())
            .cloned()
            .collect())
    }

    async fn get_job(&self, job_id: &JobId) -> StoreResult<Job> {
        self.jobs.read().get(job_id.as_str()).cloned().ok_or_else(|| {
            StoreError::not_found_with_context(
                format!("Job {} does not exist", job_id),
                ErrorContext::new("get_job")
                    .with_entity("job")
                    .with_entity_id(job_id),
            )
        })
    }

    async fn set_assigned_worker(&self, job_id: &JobId, worker_id: &WorkerId) -> StoreResult<()> {
        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(job_id.as_str()).ok_or_else(|| {
            StoreError::not_found_with_context(
                format!("Job {} does not exist", job_id),
                ErrorContext::new("set_assigned_worker")
                    .with_entity("job")
                    .with_entity_id(job_id),
            )
        })?;

        // Compare-and-set: only an unassigned job may take a worker.
        if !job.is_unassigned() {
            return Err(StoreError::conflict(format!(
                "Job {} is {} (expected unassigned)",
                job_id, job.status
            ))
            .with_operation("set_assigned_worker"));
        }

        job.assigned_worker = Some(worker_id.clone());
        Ok(())
    }

    async fn set_status(
        &self,
        job_id: &JobId,
        status: JobStatus,
        note: Option<&str>,
    ) -> StoreResult<()> {
        let mut jobs = self.jobs.write();
        let job = jobs.get_mut(job_id.as_str()).ok_or_else(|| {
            StoreError::not_found_with_context(
                format!("Job {} does not exist", job_id),
                ErrorContext::new("set_status")
                    .with_entity("job")
                    .with_entity_id(job_id),
            )
        })?;

        log::debug!(
            "job {} status {} -> {}{}",
            job_id,
            job.status,
            status,
            note.map(|n| format!(" ({})", n)).unwrap_or_default()
        );
        job.status = status;
        Ok(())
    }
}

// ==================== Employee directory ====================

/// In-memory employee directory with per-day workload and commitment maps.
#[derive(Default)]
pub struct LocalDirectory {
    workers: RwLock<BTreeMap<String, Worker>>,
    workloads: RwLock<HashMap<(String, NaiveDate), u32>>,
    commitments: RwLock<HashMap<(String, NaiveDate), Vec<TimeWindow>>>,
}

impl LocalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the directory contents with the given workers.
    pub fn seed_workers(&self, workers: Vec<Worker>) {
        let mut map = self.workers.write();
        map.clear();
        for worker in workers {
            map.insert(worker.id.as_str().to_string(), worker);
        }
    }

    pub fn insert_worker(&self, worker: Worker) {
        self.workers
            .write()
            .insert(worker.id.as_str().to_string(), worker);
    }

    /// Set a worker's assignment count for a day.
    pub fn set_workload(&self, worker_id: &WorkerId, date: NaiveDate, count: u32) {
        self.workloads
            .write()
            .insert((worker_id.as_str().to_string(), date), count);
    }

    /// Register a committed time window for a worker.
    pub fn add_commitment(&self, worker_id: &WorkerId, window: TimeWindow) {
        self.commitments
            .write()
            .entry((worker_id.as_str().to_string(), window.date()))
            .or_default()
            .push(window);
    }
}

#[async_trait]
impl EmployeeDirectory for LocalDirectory {
    async fn list_active_workers(&self, expertise: Option<&str>) -> StoreResult<Vec<Worker>> {
        Ok(self
            .workers
            .read()
            .values()
            .filter(|w| w.active)
            .filter(|w| expertise.map_or(true, |tag| w.has_expertise(tag)))
            .cloned()
            .collect())
    }

    async fn get_worker(&self, worker_id: &WorkerId) -> StoreResult<Worker> {
        self.workers
            .read()
            .get(worker_id.as_str())
            .cloned()
            .ok_or_else(|| {
                StoreError::not_found_with_context(
                    format!("Worker {} does not exist", worker_id),
                    ErrorContext::new("get_worker")
                        .with_entity("worker")
                        .with_entity_id(worker_id),
                )
            })
    }

    async fn current_workload(&self, worker_id: &WorkerId, date: NaiveDate) -> StoreResult<u32> {
        Ok(self
            .workloads
            .read()
            .get(&(worker_id.as_str().to_string(), date))
            .copied()
            .unwrap_or(0))
    }

    async fn committed_windows(
        &self,
        worker_id: &WorkerId,
        date: NaiveDate,
    ) -> StoreResult<Vec<TimeWindow>> {
        Ok(self
            .commitments
            .read()
            .get(&(worker_id.as_str().to_string(), date))
            .cloned()
            .unwrap_or_default())
    }
}

// ==================== Distance providers ====================

/// Great-circle distance via the haversine formula.
pub struct HaversineDistance;

#[async_trait]
impl DistanceProvider for HaversineDistance {
    async fn distance_km(&self, from: &GeoPoint, to: &GeoPoint) -> StoreResult<f64> {
        let lat1 = from.lat.to_radians();
        let lat2 = to.lat.to_radians();
        let dlat = (to.lat - from.lat).to_radians();
        let dlon = (to.lon - from.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        Ok(EARTH_RADIUS_KM * c)
    }
}

/// Constant-distance provider for tests.
pub struct StaticDistance {
    pub km: f64,
}

#[async_trait]
impl DistanceProvider for StaticDistance {
    async fn distance_km(&self, _from: &GeoPoint, _to: &GeoPoint) -> StoreResult<f64> {
        Ok(self.km)
    }
}

// ==================== Notification sinks ====================

/// Sink that writes assignment events to the log as JSON payloads.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn publish(&self, event: &AssignmentEvent) -> StoreResult<()> {
        match serde_json::to_string(event) {
            Ok(payload) => log::info!("assignment event: {}", payload),
            Err(e) => log::warn!("failed to serialize assignment event: {}", e),
        }
        Ok(())
    }
}

/// Sink that records events in memory, for assertions in tests.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AssignmentEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AssignmentEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn publish(&self, event: &AssignmentEvent) -> StoreResult<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
