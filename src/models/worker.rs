//! Worker (employee) record.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::api::WorkerId;
use crate::models::geo::GeoPoint;

/// Maximum value of the rolling rating scale.
pub const MAX_RATING: f64 = 5.0;

/// A candidate who can be assigned to jobs.
///
/// Treated as an immutable snapshot for the duration of one assignment
/// decision. The engine only reads these fields and reports a chosen id back
/// to the caller; the employee directory owns the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub location: GeoPoint,
    /// Expertise tags, normalized lowercase.
    #[serde(default)]
    pub expertise: BTreeSet<String>,
    /// Rolling rating on a 0..=5 scale.
    pub rating: f64,
    #[serde(default)]
    pub completed_jobs: u32,
    pub active: bool,
    pub available: bool,
}

impl Worker {
    /// Case-insensitive membership check against the expertise set.
    pub fn has_expertise(&self, category: &str) -> bool {
        self.expertise.contains(&category.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_expertise_is_case_insensitive() {
        let worker = Worker {
            id: WorkerId::new("w1"),
            name: "Ada".to_string(),
            phone: String::new(),
            location: GeoPoint::new(0.0, 0.0),
            expertise: ["plumbing".to_string()].into_iter().collect(),
            rating: 4.5,
            completed_jobs: 10,
            active: true,
            available: true,
        };
        assert!(worker.has_expertise("Plumbing"));
        assert!(worker.has_expertise("plumbing"));
        assert!(!worker.has_expertise("electrical"));
    }
}
