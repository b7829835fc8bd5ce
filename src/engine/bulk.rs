//! Bulk assignment coordination.
//!
//! Drives the single-assignment pipeline over a batch of jobs: strict input
//! order, continue-on-failure, a cooperative cancellation check before each
//! item, a bounded inter-item pause, and an in-memory workload overlay so
//! round-robin sees each batch assignment immediately instead of re-reading
//! stale store counts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::executor::AssignmentResult;
use super::Dispatcher;
use crate::api::{JobId, WorkerId};
use crate::strategy::Strategy;

/// Cooperative cancellation flag shared between a batch and its caller.
///
/// Checked before each item; an already-committed assignment is never rolled
/// back, only not-yet-started jobs are skipped.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Outcome class of one batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkItemStatus {
    Succeeded,
    Failed,
    /// Skipped due to cancellation; distinct from failure so callers do not
    /// treat untouched jobs as broken.
    Cancelled,
}

/// Per-job entry in a [`BulkOutcome`]; entries preserve input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItem {
    pub job_id: JobId,
    pub status: BulkItemStatus,
    /// Absent for cancelled items, which never started.
    pub result: Option<AssignmentResult>,
}

/// Aggregate over one batch. Built incrementally, immutable once returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub items: Vec<BulkItem>,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BulkOutcome {
    fn push(&mut self, item: BulkItem) {
        match item.status {
            BulkItemStatus::Succeeded => self.succeeded += 1,
            BulkItemStatus::Failed => self.failed += 1,
            BulkItemStatus::Cancelled => self.cancelled += 1,
        }
        self.items.push(item);
    }

    /// Job ids of failed items, for targeted retry of just the failures.
    pub fn failed_job_ids(&self) -> Vec<JobId> {
        self.items
            .iter()
            .filter(|i| i.status == BulkItemStatus::Failed)
            .map(|i| i.job_id.clone())
            .collect()
    }
}

/// In-batch workload increments not yet visible in the employee directory.
///
/// Keyed per worker and day: a batch spanning multiple days must not let an
/// assignment on one day count against another.
#[derive(Debug, Default)]
pub(crate) struct WorkloadOverlay {
    counts: HashMap<(WorkerId, NaiveDate), u32>,
}

impl WorkloadOverlay {
    pub(crate) fn get(&self, worker_id: &WorkerId, date: NaiveDate) -> u32 {
        self.counts
            .get(&(worker_id.clone(), date))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn bump(&mut self, worker_id: &WorkerId, date: NaiveDate) {
        *self.counts.entry((worker_id.clone(), date)).or_insert(0) += 1;
    }
}

impl Dispatcher {
    /// Assign a batch of jobs under one strategy.
    ///
    /// Jobs are processed sequentially in input order (round-robin fairness
    /// depends on it; other strategies simply inherit the bounded store
    /// load). A single job's failure never aborts the batch. The result list
    /// always has one entry per input id, in input order.
    pub async fn assign_batch(
        &self,
        job_ids: &[JobId],
        strategy: Strategy,
        cancel: Option<&CancelToken>,
    ) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        let mut overlay = WorkloadOverlay::default();
        let delay = Duration::from_millis(self.config().inter_item_delay_ms);

        log::info!(
            "starting batch of {} jobs with strategy {}",
            job_ids.len(),
            strategy
        );

        for (index, job_id) in job_ids.iter().enumerate() {
            if cancel.is_some_and(|t| t.is_cancelled()) {
                log::info!("batch cancelled; skipping job {}", job_id);
                outcome.push(BulkItem {
                    job_id: job_id.clone(),
                    status: BulkItemStatus::Cancelled,
                    result: None,
                });
                continue;
            }

            // Throttle sequential store writes; policy, not correctness.
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let result = match self.load_job(job_id).await {
                Ok(job) => {
                    let result = self
                        .assign_job(&job, strategy, None, Some(&overlay))
                        .await;
                    if result.success {
                        if let Some(worker_id) = &result.worker_id {
                            overlay.bump(worker_id, job.window.date());
                        }
                    }
                    result
                }
                Err(e) => AssignmentResult::failure(job_id.clone(), strategy, &e),
            };

            outcome.push(BulkItem {
                job_id: job_id.clone(),
                status: if result.success {
                    BulkItemStatus::Succeeded
                } else {
                    BulkItemStatus::Failed
                },
                result: Some(result),
            });
        }

        log::info!(
            "batch complete: {} succeeded, {} failed, {} cancelled",
            outcome.succeeded,
            outcome.failed,
            outcome.cancelled
        );
        outcome
    }
}
