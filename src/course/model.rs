//! Content model for courses
//!
//! This module defines the core data structures for representing courses.
//! The tree is Course -> Module -> Lesson, with side collections for
//! flashcards, quick-reference items, and achievement definitions. The
//! model is read-only from the perspective of the rest of the crate:
//! progress tracking only ever stores IDs taken from it.

use serde::{Deserialize, Serialize};

use crate::progress::achievements::AchievementRequirement;

/// Course difficulty rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// A complete course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier for the course
    pub id: String,
    /// URL-friendly slug
    pub slug: String,
    /// Display title
    pub title: String,
    /// Category (e.g., "systems", "databases")
    pub category: String,
    /// Difficulty rating
    pub difficulty: Difficulty,
    /// Estimated hours to complete
    pub estimated_hours: f32,
    /// Modules in order
    pub modules: Vec<Module>,
    /// Quick-reference items (optional)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference: Vec<ReferenceItem>,
    /// Flashcards for spaced review (optional)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashcards: Vec<Flashcard>,
    /// Achievement definitions for this course (optional)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<CourseAchievement>,
}

impl Course {
    /// Get total lesson count across all modules
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Find a lesson by ID anywhere in the course
    pub fn find_lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter()).find(|l| l.id == lesson_id)
    }

    /// Find the module containing a lesson
    pub fn module_for_lesson(&self, lesson_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.lessons.iter().any(|l| l.id == lesson_id))
    }

    /// Find a module by ID
    pub fn find_module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// IDs of all modules that carry quiz questions
    pub fn module_ids_with_quiz(&self) -> Vec<&str> {
        self.modules.iter().filter(|m| !m.quiz.is_empty()).map(|m| m.id.as_str()).collect()
    }
}

/// A module within a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Unique identifier within the course
    pub id: String,
    /// Display title
    pub title: String,
    /// Lessons in order
    pub lessons: Vec<Lesson>,
    /// Quiz questions for this module (optional)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quiz: Vec<QuizQuestion>,
}

impl Module {
    /// Does this module have a quiz?
    pub fn has_quiz(&self) -> bool {
        !self.quiz.is_empty()
    }
}

/// A lesson within a module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique identifier within the course
    pub id: String,
    /// Display title
    pub title: String,
    /// Markdown body, rendered by an external viewer
    pub content: String,
    /// Learning objectives
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objectives: Vec<String>,
    /// Key takeaways
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_points: Vec<String>,
    /// Estimated reading time in minutes
    pub reading_time_minutes: Option<u32>,
    /// Worked examples (optional)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<WorkedExample>,
}

/// A worked example attached to a lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkedExample {
    /// Short label
    pub title: String,
    /// Markdown body
    pub body: String,
}

/// A multiple-choice quiz question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Unique identifier within the module
    pub id: String,
    /// Question text
    pub prompt: String,
    /// Answer options
    pub options: Vec<String>,
    /// Index of the correct option
    pub answer: usize,
    /// Shown after answering (optional)
    pub explanation: Option<String>,
}

/// A flashcard for review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    /// Unique identifier within the course
    pub id: String,
    /// Front side text
    pub front: String,
    /// Back side text
    pub back: String,
    /// Topic grouping (optional)
    pub topic: Option<String>,
}

/// A quick-reference item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceItem {
    /// Unique identifier within the course
    pub id: String,
    /// Display title
    pub title: String,
    /// Markdown body
    pub body: String,
}

/// An achievement definition attached to a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAchievement {
    /// Unique identifier within the course
    pub id: String,
    /// Display title
    pub title: String,
    /// Description shown on the badge
    pub description: String,
    /// Emoji or icon name
    pub icon: String,
    /// What must be true for this achievement to unlock
    pub requirement: AchievementRequirement,
}
