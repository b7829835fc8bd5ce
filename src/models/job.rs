//! Job (booking) record and lifecycle status.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{JobId, WorkerId};
use crate::models::geo::GeoPoint;

/// Lifecycle status of a job.
///
/// A job transitions to `Assigned` only through the assignment executor;
/// nothing else in this crate mutates job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Unassigned,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unassigned" => Ok(Self::Unassigned),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown job status: {}", s)),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unassigned => "unassigned",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Scheduled time slot of a job, half-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeWindow { start, end }
    }

    /// True when two windows share any instant.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Calendar day the window starts on; used as the workload key.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

/// A unit of work requiring a worker assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Required expertise category, e.g. "plumbing".
    pub category: String,
    pub location: GeoPoint,
    pub window: TimeWindow,
    pub amount: f64,
    pub status: JobStatus,
    #[serde(default)]
    pub assigned_worker: Option<WorkerId>,
}

impl Job {
    pub fn is_unassigned(&self) -> bool {
        self.status == JobStatus::Unassigned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window(h0: u32, h1: u32) -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2026, 3, 14, h0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 14, h1, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["unassigned", "assigned", "in_progress", "completed", "cancelled"] {
            let parsed: JobStatus = s.parse().unwrap();
            assert_eq!(parsed.to_string(), s);
        }
        assert!("pending".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_window_overlap() {
        assert!(window(9, 11).overlaps(&window(10, 12)));
        assert!(window(9, 11).overlaps(&window(8, 17)));
        // Half-open: touching endpoints do not conflict
        assert!(!window(9, 11).overlaps(&window(11, 13)));
        assert!(!window(9, 11).overlaps(&window(12, 13)));
    }

    #[test]
    fn test_window_date() {
        assert_eq!(
            window(9, 11).date(),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
        );
    }
}
