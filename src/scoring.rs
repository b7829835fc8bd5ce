//! Multi-factor match scoring.
//!
//! Computes a normalized breakdown of how well a worker fits a job. Hard
//! filters (inactive, unavailable, missing required expertise, beyond max
//! distance, at the daily workload cap) disqualify a candidate outright;
//! everything else contributes a sub-score in [0, 1] combined by the
//! configured weight vector.
//!
//! Every formula here is deterministic: identical inputs and configuration
//! always produce identical breakdowns.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::worker::MAX_RATING;
use crate::models::{Job, Worker};

/// Per-candidate facts gathered from the external stores before scoring.
#[derive(Debug, Clone, Copy)]
pub struct CandidateContext {
    /// Distance between job and worker, if the provider could compute one.
    pub distance_km: Option<f64>,
    /// Assignments the worker already holds on the job's day, including any
    /// in-batch increments applied by the bulk coordinator.
    pub workload_today: u32,
    /// True when the worker has a committed window overlapping the job slot.
    pub has_conflict: bool,
}

/// Why a candidate was filtered out. Informational, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Ineligibility {
    Inactive,
    Unavailable,
    MissingExpertise { category: String },
    TooFar { distance_km: f64, max_km: f64 },
    DistanceUnknown,
    AtWorkloadCap { count: u32, cap: u32 },
}

impl std::fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "worker is inactive"),
            Self::Unavailable => write!(f, "worker is unavailable"),
            Self::MissingExpertise { category } => {
                write!(f, "worker lacks required expertise '{}'", category)
            }
            Self::TooFar {
                distance_km,
                max_km,
            } => write!(f, "worker is {:.1} km away (max {:.1})", distance_km, max_km),
            Self::DistanceUnknown => write!(f, "distance to worker could not be determined"),
            Self::AtWorkloadCap { count, cap } => {
                write!(f, "worker holds {} assignments today (cap {})", count, cap)
            }
        }
    }
}

/// Normalized sub-scores for one (job, worker) pair.
///
/// Invariant: `total` is the weighted sum of the five sub-scores under the
/// active weight vector, each sub-score in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub location: f64,
    pub availability: f64,
    pub expertise: f64,
    pub rating: f64,
    pub workload: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    /// One-line explanation used in assignment reasons and audit events.
    pub fn summary(&self) -> String {
        format!(
            "score {:.2} (location {:.2}, availability {:.2}, expertise {:.2}, rating {:.2}, workload {:.2})",
            self.total, self.location, self.availability, self.expertise, self.rating, self.workload
        )
    }
}

/// A worker that passed all hard filters, with its breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredWorker {
    pub worker: Worker,
    pub breakdown: ScoreBreakdown,
    /// Workload used for the decision (store value plus batch overlay).
    pub workload_today: u32,
}

/// Stateless scoring engine over a validated configuration.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: EngineConfig,
}

impl ScoringEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Score a worker against a job.
    ///
    /// # Returns
    /// * `Ok(ScoreBreakdown)` for an eligible candidate
    /// * `Err(Ineligibility)` when a hard filter disqualifies the worker
    pub fn score(
        &self,
        job: &Job,
        worker: &Worker,
        ctx: &CandidateContext,
    ) -> Result<ScoreBreakdown, Ineligibility> {
        if !worker.active {
            return Err(Ineligibility::Inactive);
        }
        if !worker.available {
            return Err(Ineligibility::Unavailable);
        }

        let has_expertise = worker.has_expertise(&job.category);
        if self.config.require_expertise_match && !has_expertise {
            return Err(Ineligibility::MissingExpertise {
                category: job.category.clone(),
            });
        }

        let distance_km = ctx.distance_km.ok_or(Ineligibility::DistanceUnknown)?;
        if distance_km > self.config.max_distance_km {
            return Err(Ineligibility::TooFar {
                distance_km,
                max_km: self.config.max_distance_km,
            });
        }

        let cap = self.config.max_daily_assignments;
        if ctx.workload_today >= cap {
            return Err(Ineligibility::AtWorkloadCap {
                count: ctx.workload_today,
                cap,
            });
        }

        let location = location_score(distance_km, self.config.max_distance_km);
        let availability = if ctx.has_conflict { 0.0 } else { 1.0 };
        let expertise = if has_expertise {
            1.0
        } else {
            self.config.expertise_partial_credit
        };
        let rating = (worker.rating / MAX_RATING).clamp(0.0, 1.0);
        let workload = workload_score(ctx.workload_today, cap);

        let w = &self.config.weights;
        let total = w.location * location
            + w.availability * availability
            + w.expertise * expertise
            + w.rating * rating
            + w.workload * workload;

        Ok(ScoreBreakdown {
            location,
            availability,
            expertise,
            rating,
            workload,
            total,
        })
    }
}

/// Monotonically decreasing in distance; 1.0 at zero, 0.0 at the max.
fn location_score(distance_km: f64, max_km: f64) -> f64 {
    (1.0 - distance_km / max_km).clamp(0.0, 1.0)
}

/// Decreasing in current workload relative to the cap; 0.0 at the cap.
fn workload_score(count: u32, cap: u32) -> f64 {
    (1.0 - count as f64 / cap as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{JobId, WorkerId};
    use crate::models::{GeoPoint, JobStatus, TimeWindow};
    use chrono::{TimeZone, Utc};

    fn test_job() -> Job {
        Job {
            id: JobId::new("j1"),
            category: "plumbing".to_string(),
            location: GeoPoint::new(0.0, 0.0),
            window: TimeWindow::new(
                Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 3, 14, 11, 0, 0).unwrap(),
            ),
            amount: 150.0,
            status: JobStatus::Unassigned,
            assigned_worker: None,
        }
    }

    fn test_worker(id: &str) -> Worker {
        Worker {
            id: WorkerId::new(id),
            name: id.to_uppercase(),
            phone: String::new(),
            location: GeoPoint::new(0.0, 0.1),
            expertise: ["plumbing".to_string()].into_iter().collect(),
            rating: 4.0,
            completed_jobs: 12,
            active: true,
            available: true,
        }
    }

    fn ctx(distance_km: f64) -> CandidateContext {
        CandidateContext {
            distance_km: Some(distance_km),
            workload_today: 0,
            has_conflict: false,
        }
    }

    #[test]
    fn test_inactive_worker_is_ineligible() {
        let engine = ScoringEngine::new(EngineConfig::default());
        let mut worker = test_worker("w1");
        worker.active = false;

        let err = engine.score(&test_job(), &worker, &ctx(5.0)).unwrap_err();
        assert_eq!(err, Ineligibility::Inactive);
    }

    #[test]
    fn test_unavailable_worker_is_ineligible() {
        let engine = ScoringEngine::new(EngineConfig::default());
        let mut worker = test_worker("w1");
        worker.available = false;

        let err = engine.score(&test_job(), &worker, &ctx(5.0)).unwrap_err();
        assert_eq!(err, Ineligibility::Unavailable);
    }

    #[test]
    fn test_missing_expertise_disqualifies_when_required() {
        let engine = ScoringEngine::new(EngineConfig::default());
        let mut worker = test_worker("w1");
        worker.expertise.clear();

        let err = engine.score(&test_job(), &worker, &ctx(5.0)).unwrap_err();
        assert!(matches!(err, Ineligibility::MissingExpertise { .. }));
    }

    #[test]
    fn test_missing_expertise_gets_partial_credit_when_optional() {
        let config = EngineConfig {
            require_expertise_match: false,
            ..EngineConfig::default()
        };
        let engine = ScoringEngine::new(config);
        let mut worker = test_worker("w1");
        worker.expertise.clear();

        let breakdown = engine.score(&test_job(), &worker, &ctx(5.0)).unwrap();
        assert_eq!(breakdown.expertise, 0.5);
    }

    #[test]
    fn test_beyond_max_distance_disqualifies() {
        let engine = ScoringEngine::new(EngineConfig::default());
        let err = engine
            .score(&test_job(), &test_worker("w1"), &ctx(30.0))
            .unwrap_err();
        assert!(matches!(err, Ineligibility::TooFar { .. }));
    }

    #[test]
    fn test_unknown_distance_disqualifies() {
        let engine = ScoringEngine::new(EngineConfig::default());
        let context = CandidateContext {
            distance_km: None,
            workload_today: 0,
            has_conflict: false,
        };
        let err = engine
            .score(&test_job(), &test_worker("w1"), &context)
            .unwrap_err();
        assert_eq!(err, Ineligibility::DistanceUnknown);
    }

    #[test]
    fn test_workload_cap_disqualifies() {
        let config = EngineConfig {
            max_daily_assignments: 1,
            ..EngineConfig::default()
        };
        let engine = ScoringEngine::new(config);
        let context = CandidateContext {
            distance_km: Some(5.0),
            workload_today: 1,
            has_conflict: false,
        };

        let err = engine
            .score(&test_job(), &test_worker("w1"), &context)
            .unwrap_err();
        assert_eq!(err, Ineligibility::AtWorkloadCap { count: 1, cap: 1 });
    }

    #[test]
    fn test_sub_score_formulas() {
        let engine = ScoringEngine::new(EngineConfig::default());
        let context = CandidateContext {
            distance_km: Some(12.5),
            workload_today: 2,
            has_conflict: true,
        };

        let b = engine
            .score(&test_job(), &test_worker("w1"), &context)
            .unwrap();
        assert!((b.location - 0.5).abs() < 1e-9); // 12.5 of 25 km
        assert_eq!(b.availability, 0.0); // conflicting window
        assert_eq!(b.expertise, 1.0);
        assert!((b.rating - 0.8).abs() < 1e-9); // 4.0 of 5.0
        assert!((b.workload - 0.75).abs() < 1e-9); // 2 of 8
    }

    #[test]
    fn test_total_is_weighted_sum() {
        let config = EngineConfig::default();
        let engine = ScoringEngine::new(config.clone());
        let b = engine
            .score(&test_job(), &test_worker("w1"), &ctx(10.0))
            .unwrap();

        let w = &config.weights;
        let expected = w.location * b.location
            + w.availability * b.availability
            + w.expertise * b.expertise
            + w.rating * b.rating
            + w.workload * b.workload;
        assert!((b.total - expected).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&b.total));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let engine = ScoringEngine::new(EngineConfig::default());
        let a = engine
            .score(&test_job(), &test_worker("w1"), &ctx(7.0))
            .unwrap();
        let b = engine
            .score(&test_job(), &test_worker("w1"), &ctx(7.0))
            .unwrap();
        assert_eq!(a, b);
    }
}
