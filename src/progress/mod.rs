//! Learner progress
//!
//! The persisted progress store, its data shapes, and achievement
//! evaluation.

pub mod achievements;
pub mod model;
pub mod store;

// Re-exports
pub use achievements::{AchievementCheck, AchievementRequirement, check_achievements};
pub use model::{CourseProgress, Note, Settings, SettingsUpdate, UserProgress};
pub use store::ProgressStore;
