//! Course content
//!
//! The read-only Course -> Module -> Lesson tree and the catalog that loads
//! installed courses from disk.

pub mod model;
pub mod storage;

// Re-exports
pub use model::{Course, CourseAchievement, Flashcard, Lesson, Module, QuizQuestion};
pub use storage::Catalog;
