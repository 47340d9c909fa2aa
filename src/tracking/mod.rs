//! Study-time tracking
//!
//! Activity sessions and their daily, weekly, monthly, and per-course
//! rollups.

pub mod model;
pub mod store;

// Re-exports
pub use model::{ActivityKind, ActivitySession, SessionContext, SessionOutcome};
pub use store::{MIN_SESSION_SECONDS, TrackingStore};
