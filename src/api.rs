//! Public API surface for the assignment engine.
//!
//! This file consolidates the typed identifiers and re-exports the result
//! types callers interact with. All types derive Serialize/Deserialize for
//! JSON serialization.

use serde::{Deserialize, Serialize};

pub use crate::engine::executor::AssignmentResult;
pub use crate::engine::{BulkItem, BulkItemStatus, BulkOutcome, CancelToken};
pub use crate::scoring::{ScoreBreakdown, ScoredWorker};
pub use crate::strategy::Strategy;

/// Job (booking) identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Worker (employee) identifier.
///
/// Ordering is lexicographic; it is the canonical tie-break for every
/// selection strategy, so identical inputs always resolve identically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl JobId {
    pub fn new(value: impl Into<String>) -> Self {
        JobId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl WorkerId {
    pub fn new(value: impl Into<String>) -> Self {
        WorkerId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId(s.to_string())
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        WorkerId(s.to_string())
    }
}
