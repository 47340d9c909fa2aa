//! Dojo - a local-first learning hub core
//!
//! Dojo tracks everything durable about a learner's journey through a course
//! catalog: completed lessons, best quiz scores, bookmarks, notes, unlocked
//! achievements, daily streaks, and fine-grained study-time sessions with
//! daily, weekly, and monthly rollups. All state persists to JSON files in
//! the platform data directory.

pub mod course;
pub mod export;
pub mod hub;
pub mod paths;
pub mod progress;
pub mod tracking;

pub use course::Catalog;
pub use hub::LearningHub;
pub use progress::ProgressStore;
pub use tracking::TrackingStore;
