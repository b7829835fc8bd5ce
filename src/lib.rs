//! # Dispatch Rust Backend
//!
//! Worker-assignment engine: given a pool of pending bookings and a pool of
//! candidate employees, select the best-matching available worker for each
//! job under a configurable strategy and commit the assignment
//! transactionally.
//!
//! ## Features
//!
//! - **Scoring**: deterministic multi-factor match scores (location,
//!   availability, expertise, rating, workload) under a validated weight
//!   vector
//! - **Strategies**: six selection policies from weighted best-fit to
//!   round-robin load balancing, all with reproducible tie-breaking
//! - **Execution**: at-most-one commit per job via an optimistic status
//!   re-check against the booking store
//! - **Bulk**: batch assignment with per-item isolation, cooperative
//!   cancellation, and throttled store writes
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: typed identifiers and the public result types
//! - [`models`]: job and worker records consumed from the external stores
//! - [`config`]: weight vector and tuning knobs, TOML-loadable
//! - [`store`]: traits for the booking store, employee directory, distance
//!   provider, and audit sink, plus in-memory implementations
//! - [`scoring`]: the multi-factor scoring engine and hard filters
//! - [`strategy`]: the closed strategy enum and its comparator chains
//! - [`engine`]: the dispatcher facade, assignment executor, and bulk
//!   coordinator
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dispatch_rust::config::EngineConfig;
//! use dispatch_rust::engine::Dispatcher;
//! use dispatch_rust::store::{HaversineDistance, LocalBookingStore, LocalDirectory};
//! use dispatch_rust::strategy::Strategy;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let dispatcher = Dispatcher::new(
//!     Arc::new(LocalBookingStore::new()),
//!     Arc::new(LocalDirectory::new()),
//!     Arc::new(HaversineDistance),
//!     EngineConfig::default(),
//! )?;
//! let result = dispatcher.assign_one(&"job-1".into(), Strategy::BestFit, None).await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod models;
pub mod scoring;
pub mod store;
pub mod strategy;
