//! Selection strategies.
//!
//! A closed enum over the six named policies, each a deterministic comparator
//! chain over scored candidates. No randomness anywhere: every chain ends in
//! lexicographic worker-id order, so repeated runs with identical inputs pick
//! the identical worker.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoredWorker;

/// A named policy for selecting the winning worker among eligible candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Maximum weighted total score.
    BestFit,
    /// Maximum location sub-score.
    LocationOnly,
    /// Maximum availability sub-score.
    AvailabilityOnly,
    /// Maximum `location + availability`.
    LocationAndAvailability,
    /// Lowest current-day workload; distributes batches evenly.
    RoundRobin,
    /// Caller supplies the worker id; only an eligibility re-check runs.
    Manual,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "best_fit" => Ok(Self::BestFit),
            "location_only" => Ok(Self::LocationOnly),
            "availability_only" => Ok(Self::AvailabilityOnly),
            "location_and_availability" => Ok(Self::LocationAndAvailability),
            "round_robin" => Ok(Self::RoundRobin),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Strategy {
    /// Canonical snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BestFit => "best_fit",
            Self::LocationOnly => "location_only",
            Self::AvailabilityOnly => "availability_only",
            Self::LocationAndAvailability => "location_and_availability",
            Self::RoundRobin => "round_robin",
            Self::Manual => "manual",
        }
    }

    /// Ordered factor list considered by the strategy.
    ///
    /// Display/explanation only; selection is the comparator chain in
    /// [`Strategy::compare`], not this list.
    pub fn factors(&self) -> &'static [&'static str] {
        match self {
            Self::BestFit => &["location", "availability", "expertise", "rating", "workload"],
            Self::LocationOnly => &["location"],
            Self::AvailabilityOnly => &["availability"],
            Self::LocationAndAvailability => &["location", "availability"],
            Self::RoundRobin => &["workload"],
            Self::Manual => &[],
        }
    }

    /// Compare two candidates; `Less` means `a` ranks ahead of `b`.
    ///
    /// Scores compare via `total_cmp` so the chain is a total order, and the
    /// terminal comparator is always ascending worker id, which makes
    /// resolution reproducible across runs.
    pub fn compare(&self, a: &ScoredWorker, b: &ScoredWorker) -> Ordering {
        let by_id = a.worker.id.cmp(&b.worker.id);
        match self {
            Self::BestFit => score_desc(a.breakdown.total, b.breakdown.total).then(by_id),
            Self::LocationOnly => score_desc(a.breakdown.location, b.breakdown.location)
                .then(score_desc(a.breakdown.total, b.breakdown.total))
                .then(by_id),
            Self::AvailabilityOnly => {
                score_desc(a.breakdown.availability, b.breakdown.availability)
                    .then(score_desc(a.breakdown.total, b.breakdown.total))
                    .then(by_id)
            }
            Self::LocationAndAvailability => score_desc(
                a.breakdown.location + a.breakdown.availability,
                b.breakdown.location + b.breakdown.availability,
            )
            .then(score_desc(a.breakdown.total, b.breakdown.total))
            .then(by_id),
            Self::RoundRobin => a.workload_today.cmp(&b.workload_today).then(by_id),
            // Manual never ranks; defined for completeness.
            Self::Manual => by_id,
        }
    }

    /// Rank candidates best-first.
    pub fn rank<'a>(&self, candidates: &'a [ScoredWorker]) -> Vec<&'a ScoredWorker> {
        let mut ranked: Vec<&ScoredWorker> = candidates.iter().collect();
        ranked.sort_by(|a, b| self.compare(a, b));
        ranked
    }

    /// Pick the winning candidate, if any.
    pub fn select<'a>(&self, candidates: &'a [ScoredWorker]) -> Option<&'a ScoredWorker> {
        candidates.iter().min_by(|a, b| self.compare(a, b))
    }
}

/// Descending order on a score pair (higher is better).
fn score_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WorkerId;
    use crate::models::{GeoPoint, Worker};
    use crate::scoring::ScoreBreakdown;

    fn candidate(id: &str, breakdown: ScoreBreakdown, workload: u32) -> ScoredWorker {
        ScoredWorker {
            worker: Worker {
                id: WorkerId::new(id),
                name: id.to_uppercase(),
                phone: String::new(),
                location: GeoPoint::new(0.0, 0.0),
                expertise: Default::default(),
                rating: 4.0,
                completed_jobs: 0,
                active: true,
                available: true,
            },
            breakdown,
            workload_today: workload,
        }
    }

    fn breakdown(location: f64, availability: f64, total: f64) -> ScoreBreakdown {
        ScoreBreakdown {
            location,
            availability,
            expertise: 1.0,
            rating: 0.8,
            workload: 1.0,
            total,
        }
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        for name in [
            "best_fit",
            "location_only",
            "availability_only",
            "location_and_availability",
            "round_robin",
            "manual",
        ] {
            let strategy: Strategy = name.parse().unwrap();
            assert_eq!(strategy.to_string(), name);
        }
        assert!("random".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_best_fit_picks_max_total() {
        let candidates = vec![
            candidate("w1", breakdown(0.5, 1.0, 0.70), 0),
            candidate("w2", breakdown(0.9, 1.0, 0.85), 0),
            candidate("w3", breakdown(0.2, 1.0, 0.60), 0),
        ];
        let winner = Strategy::BestFit.select(&candidates).unwrap();
        assert_eq!(winner.worker.id, WorkerId::new("w2"));
    }

    #[test]
    fn test_best_fit_equal_scores_break_by_smaller_id() {
        let candidates = vec![
            candidate("w9", breakdown(0.5, 1.0, 0.80), 0),
            candidate("w2", breakdown(0.5, 1.0, 0.80), 0),
        ];
        let winner = Strategy::BestFit.select(&candidates).unwrap();
        assert_eq!(winner.worker.id, WorkerId::new("w2"));
    }

    #[test]
    fn test_location_only_tie_falls_to_total_then_id() {
        let candidates = vec![
            candidate("w1", breakdown(0.9, 0.0, 0.60), 0),
            candidate("w2", breakdown(0.9, 1.0, 0.75), 0),
        ];
        let winner = Strategy::LocationOnly.select(&candidates).unwrap();
        assert_eq!(winner.worker.id, WorkerId::new("w2"));

        // Identical location and total: id breaks the tie
        let candidates = vec![
            candidate("w2", breakdown(0.9, 1.0, 0.75), 0),
            candidate("w1", breakdown(0.9, 1.0, 0.75), 0),
        ];
        let winner = Strategy::LocationOnly.select(&candidates).unwrap();
        assert_eq!(winner.worker.id, WorkerId::new("w1"));
    }

    #[test]
    fn test_availability_only_prefers_free_worker() {
        let candidates = vec![
            candidate("w1", breakdown(1.0, 0.0, 0.90), 0),
            candidate("w2", breakdown(0.1, 1.0, 0.40), 0),
        ];
        let winner = Strategy::AvailabilityOnly.select(&candidates).unwrap();
        assert_eq!(winner.worker.id, WorkerId::new("w2"));
    }

    #[test]
    fn test_location_and_availability_sums_the_pair() {
        let candidates = vec![
            candidate("w1", breakdown(0.9, 0.0, 0.80), 0), // pair sum 0.9
            candidate("w2", breakdown(0.5, 1.0, 0.60), 0), // pair sum 1.5
        ];
        let winner = Strategy::LocationAndAvailability.select(&candidates).unwrap();
        assert_eq!(winner.worker.id, WorkerId::new("w2"));
    }

    #[test]
    fn test_round_robin_picks_least_loaded() {
        let candidates = vec![
            candidate("w1", breakdown(0.9, 1.0, 0.95), 3),
            candidate("w2", breakdown(0.1, 1.0, 0.40), 1),
            candidate("w3", breakdown(0.5, 1.0, 0.70), 1),
        ];
        // w2 and w3 tie on workload; smaller id wins
        let winner = Strategy::RoundRobin.select(&candidates).unwrap();
        assert_eq!(winner.worker.id, WorkerId::new("w2"));
    }

    #[test]
    fn test_rank_is_total_and_deterministic() {
        let candidates = vec![
            candidate("w3", breakdown(0.4, 1.0, 0.70), 0),
            candidate("w1", breakdown(0.4, 1.0, 0.70), 0),
            candidate("w2", breakdown(0.8, 1.0, 0.90), 0),
        ];
        let first = Strategy::BestFit.rank(&candidates);
        let second = Strategy::BestFit.rank(&candidates);
        let ids: Vec<&str> = first.iter().map(|c| c.worker.id.as_str()).collect();
        assert_eq!(ids, vec!["w2", "w1", "w3"]);
        assert_eq!(
            ids,
            second
                .iter()
                .map(|c| c.worker.id.as_str())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_select_empty_is_none() {
        assert!(Strategy::BestFit.select(&[]).is_none());
    }

    #[test]
    fn test_factor_lists() {
        assert_eq!(Strategy::BestFit.factors().len(), 5);
        assert_eq!(Strategy::LocationOnly.factors(), &["location"]);
        assert_eq!(Strategy::RoundRobin.factors(), &["workload"]);
        assert!(Strategy::Manual.factors().is_empty());
    }
}
