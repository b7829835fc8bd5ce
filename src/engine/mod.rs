//! Assignment orchestration.
//!
//! [`Dispatcher`] is the facade callers use: preview candidates for a job,
//! commit a single assignment, or drive a whole batch. It wires the scoring
//! engine and strategy resolution to the external stores and wraps every
//! store call in the configured timeout.

pub mod bulk;
pub mod error;
pub mod executor;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use bulk::{BulkItem, BulkItemStatus, BulkOutcome, CancelToken};
pub use error::AssignmentError;
pub use executor::{AssignmentExecutor, AssignmentResult};

use bulk::WorkloadOverlay;

use crate::api::{JobId, WorkerId};
use crate::config::{ConfigResult, EngineConfig};
use crate::models::Job;
use crate::scoring::{CandidateContext, ScoredWorker, ScoringEngine};
use crate::store::{
    BookingStore, DistanceProvider, EmployeeDirectory, NotificationSink, StoreError, StoreResult,
};
use crate::strategy::Strategy;

/// Run a store call under the configured timeout.
///
/// A timeout surfaces as a retryable `StoreError::Timeout`, never a crash.
pub(crate) async fn timed<T, F>(timeout: Duration, operation: &str, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(
            StoreError::timeout(format!("store call exceeded {} ms", timeout.as_millis()))
                .with_operation(operation),
        ),
    }
}

/// The worker-assignment engine facade.
pub struct Dispatcher {
    bookings: Arc<dyn BookingStore>,
    directory: Arc<dyn EmployeeDirectory>,
    distance: Arc<dyn DistanceProvider>,
    scoring: ScoringEngine,
    executor: AssignmentExecutor,
    config: EngineConfig,
}

impl Dispatcher {
    /// Build a dispatcher over the given collaborators.
    ///
    /// Validates the configuration up front: a mis-summing weight vector is
    /// rejected here, before any scoring can happen.
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        directory: Arc<dyn EmployeeDirectory>,
        distance: Arc<dyn DistanceProvider>,
        config: EngineConfig,
    ) -> ConfigResult<Self> {
        config.validate()?;
        let store_timeout = Duration::from_millis(config.store_timeout_ms);
        Ok(Self {
            executor: AssignmentExecutor::new(bookings.clone(), store_timeout),
            scoring: ScoringEngine::new(config.clone()),
            bookings,
            directory,
            distance,
            config,
        })
    }

    /// Attach an audit sink; committed assignments are published to it
    /// fire-and-forget.
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.executor = self.executor.with_sink(sink);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.config.store_timeout_ms)
    }

    /// Preview eligible candidates for a job, best-first.
    ///
    /// Read-only: ranks with the same deterministic ordering `best_fit` uses
    /// and commits nothing.
    pub async fn list_eligible_workers(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<ScoredWorker>, AssignmentError> {
        let job = self.load_job(job_id).await?;
        let candidates = self.load_candidates(&job, None).await?;
        Ok(Strategy::BestFit
            .rank(&candidates)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Assign a single job under the given strategy.
    ///
    /// `manual_worker` is consulted only by [`Strategy::Manual`]. Every
    /// failure mode comes back as a failed result, never an `Err`.
    pub async fn assign_one(
        &self,
        job_id: &JobId,
        strategy: Strategy,
        manual_worker: Option<WorkerId>,
    ) -> AssignmentResult {
        match self.load_job(job_id).await {
            Ok(job) => {
                self.assign_job(&job, strategy, manual_worker.as_ref(), None)
                    .await
            }
            Err(e) => AssignmentResult::failure(job_id.clone(), strategy, &e),
        }
    }

    /// Single-job pipeline shared by interactive and bulk paths.
    pub(crate) async fn assign_job(
        &self,
        job: &Job,
        strategy: Strategy,
        manual_worker: Option<&WorkerId>,
        overlay: Option<&WorkloadOverlay>,
    ) -> AssignmentResult {
        match self.decide(job, strategy, manual_worker, overlay).await {
            Ok(decision) => {
                self.executor
                    .assign(
                        &job.id,
                        &decision.worker_id,
                        decision.score,
                        &decision.reason,
                        strategy,
                    )
                    .await
            }
            Err(e) => {
                log::info!("no assignment for job {}: {}", job.id, e);
                AssignmentResult::failure(job.id.clone(), strategy, &e)
            }
        }
    }

    /// Pick the worker for a job without committing anything.
    async fn decide(
        &self,
        job: &Job,
        strategy: Strategy,
        manual_worker: Option<&WorkerId>,
        overlay: Option<&WorkloadOverlay>,
    ) -> Result<Decision, AssignmentError> {
        if !job.is_unassigned() {
            return Err(AssignmentError::AlreadyAssigned {
                job_id: job.id.clone(),
            });
        }

        if strategy == Strategy::Manual {
            let worker_id = manual_worker.ok_or(AssignmentError::ManualWorkerRequired)?;
            self.recheck_manual(job, worker_id, overlay).await?;
            return Ok(Decision {
                worker_id: worker_id.clone(),
                score: None,
                reason: format!("manually selected worker {}", worker_id),
            });
        }

        let candidates = self.load_candidates(job, overlay).await?;
        let winner = strategy
            .select(&candidates)
            .ok_or(AssignmentError::NoEligibleCandidates {
                job_id: job.id.clone(),
            })?;

        Ok(Decision {
            worker_id: winner.worker.id.clone(),
            score: Some(winner.breakdown.total),
            reason: format!("{}: {}", strategy, winner.breakdown.summary()),
        })
    }

    pub(crate) async fn load_job(&self, job_id: &JobId) -> Result<Job, AssignmentError> {
        timed(self.store_timeout(), "get_job", self.bookings.get_job(job_id))
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => AssignmentError::JobNotFound(job_id.clone()),
                other => AssignmentError::Persistence(other),
            })
    }

    /// Load and score every candidate that passes the hard filters.
    async fn load_candidates(
        &self,
        job: &Job,
        overlay: Option<&WorkloadOverlay>,
    ) -> Result<Vec<ScoredWorker>, AssignmentError> {
        let expertise_filter = if self.config.require_expertise_match {
            Some(job.category.as_str())
        } else {
            None
        };

        let workers = timed(
            self.store_timeout(),
            "list_active_workers",
            self.directory.list_active_workers(expertise_filter),
        )
        .await?;

        let date = job.window.date();
        let timeout = self.store_timeout();

        // Per-candidate lookups are read-only and independent, so gather
        // them concurrently; join_all preserves input order.
        let lookups = workers.into_iter().map(|worker| async move {
            // A failed distance lookup disqualifies the one candidate, not
            // the whole decision.
            let distance_km = match timed(
                timeout,
                "distance_km",
                self.distance.distance_km(&job.location, &worker.location),
            )
            .await
            {
                Ok(d) => Some(d),
                Err(e) => {
                    log::debug!("distance lookup failed for worker {}: {}", worker.id, e);
                    None
                }
            };

            let stored_workload = timed(
                timeout,
                "current_workload",
                self.directory.current_workload(&worker.id, date),
            )
            .await?;

            let windows = timed(
                timeout,
                "committed_windows",
                self.directory.committed_windows(&worker.id, date),
            )
            .await?;
            let has_conflict = windows.iter().any(|w| w.overlaps(&job.window));

            Ok::<_, StoreError>((
                worker,
                CandidateContext {
                    distance_km,
                    workload_today: stored_workload,
                    has_conflict,
                },
            ))
        });

        let mut candidates = Vec::new();
        for looked_up in futures::future::join_all(lookups).await {
            let (worker, mut ctx) = looked_up?;
            ctx.workload_today += overlay.map_or(0, |o| o.get(&worker.id, date));

            match self.scoring.score(job, &worker, &ctx) {
                Ok(breakdown) => candidates.push(ScoredWorker {
                    workload_today: ctx.workload_today,
                    worker,
                    breakdown,
                }),
                Err(reason) => {
                    log::debug!(
                        "worker {} ineligible for job {}: {}",
                        worker.id,
                        job.id,
                        reason
                    );
                }
            }
        }

        Ok(candidates)
    }

    /// Eligibility re-check for manual picks: the worker must exist, be
    /// active, and sit under the daily workload cap. No scoring runs.
    async fn recheck_manual(
        &self,
        job: &Job,
        worker_id: &WorkerId,
        overlay: Option<&WorkloadOverlay>,
    ) -> Result<(), AssignmentError> {
        let worker = timed(
            self.store_timeout(),
            "get_worker",
            self.directory.get_worker(worker_id),
        )
        .await
        .map_err(|e| match e {
            StoreError::NotFound { .. } => AssignmentError::WorkerNotFound(worker_id.clone()),
            other => AssignmentError::Persistence(other),
        })?;

        if !worker.active {
            return Err(AssignmentError::IneligibleWorker {
                worker_id: worker_id.clone(),
                reason: "worker is inactive".to_string(),
            });
        }

        let date = job.window.date();
        let workload = timed(
            self.store_timeout(),
            "current_workload",
            self.directory.current_workload(worker_id, date),
        )
        .await?
            + overlay.map_or(0, |o| o.get(worker_id, date));

        let cap = self.config.max_daily_assignments;
        if workload >= cap {
            return Err(AssignmentError::IneligibleWorker {
                worker_id: worker_id.clone(),
                reason: format!("worker holds {} assignments today (cap {})", workload, cap),
            });
        }

        Ok(())
    }
}

struct Decision {
    worker_id: WorkerId,
    score: Option<f64>,
    reason: String,
}
