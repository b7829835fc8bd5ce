//! Domain records consumed by the assignment engine.
//!
//! `Job` and `Worker` are owned by the external stores; the engine holds
//! read-only snapshots for the duration of one assignment decision and never
//! mutates them directly.

pub mod geo;
pub mod job;
pub mod worker;

pub use geo::GeoPoint;
pub use job::{Job, JobStatus, TimeWindow};
pub use worker::Worker;
