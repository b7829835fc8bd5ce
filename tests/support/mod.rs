//! Shared fixtures for the integration suites.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use dispatch_rust::api::{JobId, WorkerId};
use dispatch_rust::config::EngineConfig;
use dispatch_rust::engine::Dispatcher;
use dispatch_rust::models::{GeoPoint, Job, JobStatus, TimeWindow, Worker};
use dispatch_rust::store::{LocalBookingStore, LocalDirectory, StaticDistance};

/// All fixture jobs share this date so workload counting is predictable.
pub fn fixture_window(start_hour: u32, end_hour: u32) -> TimeWindow {
    TimeWindow::new(
        Utc.with_ymd_and_hms(2026, 3, 14, start_hour, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 14, end_hour, 0, 0).unwrap(),
    )
}

pub fn job(id: &str, category: &str, start_hour: u32) -> Job {
    Job {
        id: JobId::new(id),
        category: category.to_string(),
        location: GeoPoint::new(40.0, -3.0),
        window: fixture_window(start_hour, start_hour + 2),
        amount: 120.0,
        status: JobStatus::Unassigned,
        assigned_worker: None,
    }
}

pub fn worker(id: &str, rating: f64, tags: &[&str]) -> Worker {
    Worker {
        id: WorkerId::new(id),
        name: id.to_uppercase(),
        phone: format!("+34 600 000 {}", id.len()),
        location: GeoPoint::new(40.1, -3.1),
        expertise: tags.iter().map(|t| t.to_string()).collect(),
        rating,
        completed_jobs: 20,
        active: true,
        available: true,
    }
}

/// Config tuned for tests: no inter-item pause, short store timeout.
pub fn test_config() -> EngineConfig {
    EngineConfig {
        inter_item_delay_ms: 0,
        store_timeout_ms: 1_000,
        ..EngineConfig::default()
    }
}

/// Dispatcher over fresh local stores and a constant 5 km distance.
pub struct Fixture {
    pub bookings: Arc<LocalBookingStore>,
    pub directory: Arc<LocalDirectory>,
    pub dispatcher: Dispatcher,
}

pub fn fixture_with_config(config: EngineConfig) -> Fixture {
    let bookings = Arc::new(LocalBookingStore::new());
    let directory = Arc::new(LocalDirectory::new());
    let dispatcher = Dispatcher::new(
        bookings.clone(),
        directory.clone(),
        Arc::new(StaticDistance { km: 5.0 }),
        config,
    )
    .expect("test config must validate");
    Fixture {
        bookings,
        directory,
        dispatcher,
    }
}

pub fn fixture() -> Fixture {
    fixture_with_config(test_config())
}
