//! End-to-end demo against the in-memory stores.
//!
//! Seeds a handful of jobs and workers, previews candidates for the first
//! job, then runs a best-fit batch and prints the outcome.

use std::sync::Arc;

use anyhow::Result;
use chrono::{TimeZone, Utc};

use dispatch_rust::api::{JobId, WorkerId};
use dispatch_rust::config::EngineConfig;
use dispatch_rust::engine::Dispatcher;
use dispatch_rust::models::{GeoPoint, Job, JobStatus, TimeWindow, Worker};
use dispatch_rust::store::{HaversineDistance, LocalBookingStore, LocalDirectory, LogSink};
use dispatch_rust::strategy::Strategy;

fn seed_job(id: &str, category: &str, lat: f64, lon: f64, hour: u32) -> Job {
    Job {
        id: JobId::new(id),
        category: category.to_string(),
        location: GeoPoint::new(lat, lon),
        window: TimeWindow::new(
            Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 14, hour + 2, 0, 0).unwrap(),
        ),
        amount: 150.0,
        status: JobStatus::Unassigned,
        assigned_worker: None,
    }
}

fn seed_worker(id: &str, rating: f64, lat: f64, lon: f64, tags: &[&str]) -> Worker {
    Worker {
        id: WorkerId::new(id),
        name: id.to_uppercase(),
        phone: String::new(),
        location: GeoPoint::new(lat, lon),
        expertise: tags.iter().map(|t| t.to_string()).collect(),
        rating,
        completed_jobs: 25,
        active: true,
        available: true,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match EngineConfig::from_default_location() {
        Ok(config) => config,
        Err(_) => EngineConfig::default(),
    };

    let bookings = Arc::new(LocalBookingStore::new());
    let directory = Arc::new(LocalDirectory::new());

    bookings.seed(vec![
        seed_job("booking-001", "plumbing", 40.4168, -3.7038, 9),
        seed_job("booking-002", "plumbing", 40.4300, -3.6900, 11),
        seed_job("booking-003", "electrical", 40.4000, -3.7200, 14),
    ]);
    directory.seed_workers(vec![
        seed_worker("emp-ana", 4.8, 40.4200, -3.7000, &["plumbing"]),
        seed_worker("emp-bruno", 4.2, 40.4100, -3.7100, &["plumbing", "electrical"]),
        seed_worker("emp-carla", 4.9, 40.4400, -3.6800, &["electrical"]),
    ]);

    let dispatcher = Dispatcher::new(
        bookings.clone(),
        directory,
        Arc::new(HaversineDistance),
        config,
    )?
    .with_sink(Arc::new(LogSink));

    let first = JobId::new("booking-001");
    println!("Candidates for {}:", first);
    for candidate in dispatcher.list_eligible_workers(&first).await? {
        println!(
            "  {} -> {}",
            candidate.worker.id,
            candidate.breakdown.summary()
        );
    }

    let batch = vec![
        JobId::new("booking-001"),
        JobId::new("booking-002"),
        JobId::new("booking-003"),
    ];
    let outcome = dispatcher
        .assign_batch(&batch, Strategy::BestFit, None)
        .await;

    println!(
        "\nBatch: {} succeeded, {} failed, {} cancelled",
        outcome.succeeded, outcome.failed, outcome.cancelled
    );
    for item in &outcome.items {
        match &item.result {
            Some(result) if result.success => println!(
                "  {} -> {} ({})",
                item.job_id,
                result.worker_id.as_ref().map(|w| w.as_str()).unwrap_or("-"),
                result.reason
            ),
            Some(result) => println!("  {} failed: {}", item.job_id, result.reason),
            None => println!("  {} cancelled", item.job_id),
        }
    }

    Ok(())
}
