//! Persisted progress data shapes
//!
//! These structs are the on-disk format of `progress.json`. Mutation logic
//! lives in [`super::store::ProgressStore`]; this module only defines the
//! records, their defaults, and the one-time legacy note migration.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note attached to a lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable identifier
    pub id: Uuid,
    /// Free-text body
    pub content: String,
    /// Unix timestamp of first save, immutable afterwards
    pub created_at: i64,
    /// Unix timestamp of the most recent save
    pub updated_at: i64,
}

impl Note {
    /// Create a note with both timestamps set to `now`
    pub fn new(content: impl Into<String>, now: i64) -> Self {
        Self { id: Uuid::new_v4(), content: content.into(), created_at: now, updated_at: now }
    }

    /// Replace the content and refresh `updated_at`, keeping `created_at`
    pub fn edit(&mut self, content: impl Into<String>, now: i64) {
        self.content = content.into();
        self.updated_at = now;
    }
}

/// Progress for a single course, created lazily on first write
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    /// Completed lesson IDs; membership matters, order does not
    pub completed_lessons: HashSet<String>,
    /// Best quiz score per module ID, monotonic non-decreasing
    pub quiz_scores: HashMap<String, u8>,
    /// Bookmarked lesson IDs
    pub bookmarks: HashSet<String>,
    /// Notes per lesson ID
    pub notes: HashMap<String, Note>,
    /// Plain-string notes written by older releases; folded into `notes`
    /// at load time and never written back
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub legacy_notes: HashMap<String, String>,
    /// Unlocked achievement IDs, append-only
    pub unlocked_achievements: HashSet<String>,
    /// Lesson to resume from
    pub last_accessed_lesson: Option<String>,
    /// Unix timestamp of the last visit
    pub last_accessed_at: Option<i64>,
    /// Unix timestamp of the first mutation, set once
    pub started_at: Option<i64>,
}

/// Learner-facing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Theme name for the front end
    pub theme: String,
    /// Display name shown in greetings
    pub display_name: String,
    /// Daily study goal in minutes
    pub daily_goal_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self { theme: "dark".to_string(), display_name: String::new(), daily_goal_minutes: 30 }
    }
}

/// A partial settings update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub theme: Option<String>,
    pub display_name: Option<String>,
    pub daily_goal_minutes: Option<u32>,
}

impl Settings {
    /// Merge a partial update into the current settings
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(name) = update.display_name {
            self.display_name = name;
        }
        if let Some(minutes) = update.daily_goal_minutes {
            self.daily_goal_minutes = minutes;
        }
    }
}

/// The single global progress record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    /// Consecutive active days, updated at most once per calendar day
    pub current_streak: u32,
    /// High-water mark of `current_streak`
    pub longest_streak: u32,
    /// Calendar date of the last streak update, `YYYY-MM-DD` local time
    pub last_active_date: Option<String>,
    /// Per-course progress
    pub courses: HashMap<String, CourseProgress>,
    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

impl UserProgress {
    /// Get or create progress for a course
    pub fn course_mut(&mut self, course_id: &str) -> &mut CourseProgress {
        self.courses.entry(course_id.to_string()).or_default()
    }

    /// Fold legacy plain-string notes into rich [`Note`] records.
    ///
    /// Runs once, at load time. A legacy entry whose lesson already has a
    /// rich note is dropped (the rich record wins). Returns how many notes
    /// were migrated.
    pub fn migrate_legacy_notes(&mut self, now: i64) -> usize {
        let mut migrated = 0;
        for progress in self.courses.values_mut() {
            for (lesson_id, content) in std::mem::take(&mut progress.legacy_notes) {
                if !progress.notes.contains_key(&lesson_id) {
                    progress.notes.insert(lesson_id, Note::new(content, now));
                    migrated += 1;
                }
            }
        }
        migrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_edit_keeps_created_at() {
        let mut note = Note::new("first", 100);
        note.edit("second", 200);

        assert_eq!(note.content, "second");
        assert_eq!(note.created_at, 100);
        assert_eq!(note.updated_at, 200);
    }

    #[test]
    fn course_mut_creates_entry_if_missing() {
        let mut progress = UserProgress::default();
        progress.course_mut("rust-101").completed_lessons.insert("l1".into());

        assert!(progress.courses.contains_key("rust-101"));
    }

    #[test]
    fn settings_apply_merges_only_set_fields() {
        let mut settings = Settings::default();
        settings.apply(SettingsUpdate { display_name: Some("Niall".into()), ..Default::default() });

        assert_eq!(settings.display_name, "Niall");
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.daily_goal_minutes, 30);
    }

    #[test]
    fn legacy_notes_migrate_once() {
        let mut progress = UserProgress::default();
        let course = progress.course_mut("c1");
        course.legacy_notes.insert("l1".into(), "old note".into());
        course.legacy_notes.insert("l2".into(), "other".into());
        course.notes.insert("l2".into(), Note::new("rich wins", 50));

        let migrated = progress.migrate_legacy_notes(100);
        assert_eq!(migrated, 1);

        let course = &progress.courses["c1"];
        assert!(course.legacy_notes.is_empty());
        assert_eq!(course.notes["l1"].content, "old note");
        assert_eq!(course.notes["l1"].created_at, 100);
        assert_eq!(course.notes["l2"].content, "rich wins");
    }

    #[test]
    fn legacy_field_absent_from_serialized_form_when_empty() {
        let mut progress = UserProgress::default();
        progress.course_mut("c1");

        let json = serde_json::to_string(&progress).unwrap();
        assert!(!json.contains("legacy_notes"));
    }

    #[test]
    fn deserializes_blob_with_legacy_notes() {
        let json = r#"{
            "current_streak": 2,
            "longest_streak": 5,
            "last_active_date": "2026-08-01",
            "courses": {
                "c1": {
                    "completed_lessons": ["l1"],
                    "quiz_scores": {"m1": 80},
                    "bookmarks": [],
                    "notes": {},
                    "legacy_notes": {"l1": "from v1"},
                    "unlocked_achievements": [],
                    "last_accessed_lesson": null,
                    "last_accessed_at": null,
                    "started_at": null
                }
            }
        }"#;

        let progress: UserProgress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.courses["c1"].legacy_notes["l1"], "from v1");
        assert_eq!(progress.settings, Settings::default());
    }
}
