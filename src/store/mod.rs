//! External collaborator seam.
//!
//! The engine talks to its collaborators only through the traits defined
//! here, keeping the scoring and selection algorithms decoupled from storage
//! concerns.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Caller (admin service, CLI, automation)                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Engine (scoring, strategy, executor, bulk)             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Store traits (traits.rs) - Abstract Interfaces         │
//! │  BookingStore · EmployeeDirectory ·                     │
//! │  DistanceProvider · NotificationSink                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │           Local implementations               │
//!     │        (in-memory, tests and dev)             │
//!     └──────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod local;
pub mod traits;

pub use error::{ErrorContext, StoreError, StoreResult};
pub use local::{
    HaversineDistance, LocalBookingStore, LocalDirectory, LogSink, RecordingSink, StaticDistance,
};
pub use traits::{
    AssignmentEvent, BookingStore, DistanceProvider, EmployeeDirectory, NotificationSink,
};
