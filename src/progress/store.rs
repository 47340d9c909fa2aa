//! The progress store
//!
//! Single source of truth for durable learner progress. Every mutating
//! operation persists the whole record before returning, and a failed write
//! reaches the caller as an error instead of leaving memory and disk
//! silently out of sync.
//!
//! Queries never fail for unknown courses or lessons; they degrade to
//! false/zero/empty defaults. Writes create the course record lazily.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};

use super::model::{CourseProgress, Note, Settings, SettingsUpdate, UserProgress};
use crate::paths;

/// A flattened note listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    /// Course the note belongs to
    pub course_id: String,
    /// Lesson the note is attached to
    pub lesson_id: String,
    /// The note itself
    pub note: Note,
}

/// Persisted learner progress with write-through semantics
#[derive(Debug)]
pub struct ProgressStore {
    data: UserProgress,
    path: PathBuf,
}

impl ProgressStore {
    /// Open the store at the default platform path
    pub fn open() -> Result<Self> {
        Self::open_at(paths::progress_path()?)
    }

    /// Open the store at an explicit path
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read progress from {:?}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse progress.json")?
        } else {
            UserProgress::default()
        };

        let mut store = Self { data, path };
        let migrated = store.data.migrate_legacy_notes(Utc::now().timestamp());
        if migrated > 0 {
            tracing::warn!(migrated, "migrated legacy plain-text notes");
            store.save()?;
        }

        Ok(store)
    }

    /// Read access to the whole record
    pub fn data(&self) -> &UserProgress {
        &self.data
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.data.settings
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(&self.data)
            .with_context(|| "Failed to serialize progress")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write progress to {:?}", self.path))?;

        Ok(())
    }

    /// Get or create the course record, stamping `started_at` on first write
    fn course_entry(&mut self, course_id: &str, now: i64) -> &mut CourseProgress {
        let course = self.data.course_mut(course_id);
        course.started_at.get_or_insert(now);
        course
    }

    /// Add a lesson to the completed set. No-op if already present.
    pub fn mark_lesson_complete(&mut self, course_id: &str, lesson_id: &str) -> Result<()> {
        if self.is_lesson_complete(course_id, lesson_id) {
            return Ok(());
        }

        let now = Utc::now().timestamp();
        let course = self.course_entry(course_id, now);
        course.completed_lessons.insert(lesson_id.to_string());
        course.last_accessed_at = Some(now);
        self.save()
    }

    /// Remove a lesson from the completed set. No-op if the course has no
    /// progress yet.
    pub fn unmark_lesson_complete(&mut self, course_id: &str, lesson_id: &str) -> Result<()> {
        let Some(course) = self.data.courses.get_mut(course_id) else {
            return Ok(());
        };

        if course.completed_lessons.remove(lesson_id) {
            self.save()?;
        }
        Ok(())
    }

    /// Is the lesson in the completed set? False for unknown courses.
    pub fn is_lesson_complete(&self, course_id: &str, lesson_id: &str) -> bool {
        self.data
            .courses
            .get(course_id)
            .is_some_and(|c| c.completed_lessons.contains(lesson_id))
    }

    /// Record a quiz score, keeping the best score per module.
    ///
    /// The caller computes `score` as `round(correct / total * 100)`. A new
    /// score only overwrites a stored one when strictly greater.
    pub fn update_quiz_score(&mut self, course_id: &str, module_id: &str, score: u8) -> Result<()> {
        let existing =
            self.data.courses.get(course_id).and_then(|c| c.quiz_scores.get(module_id)).copied();
        if existing.is_some_and(|best| score <= best) {
            return Ok(());
        }

        let now = Utc::now().timestamp();
        let course = self.course_entry(course_id, now);
        course.quiz_scores.insert(module_id.to_string(), score);
        self.save()
    }

    /// Flip a lesson's bookmark. Returns whether it is now bookmarked.
    pub fn toggle_bookmark(&mut self, course_id: &str, lesson_id: &str) -> Result<bool> {
        let now = Utc::now().timestamp();
        let course = self.course_entry(course_id, now);

        let bookmarked = if course.bookmarks.remove(lesson_id) {
            false
        } else {
            course.bookmarks.insert(lesson_id.to_string());
            true
        };

        self.save()?;
        Ok(bookmarked)
    }

    /// Upsert a note for a lesson. `created_at` survives edits; `updated_at`
    /// refreshes on every save.
    pub fn save_note(&mut self, course_id: &str, lesson_id: &str, content: &str) -> Result<()> {
        let now = Utc::now().timestamp();
        let course = self.course_entry(course_id, now);

        match course.notes.get_mut(lesson_id) {
            Some(note) => note.edit(content, now),
            None => {
                course.notes.insert(lesson_id.to_string(), Note::new(content, now));
            }
        }

        self.save()
    }

    /// Note content for a lesson, or the empty string
    pub fn get_note(&self, course_id: &str, lesson_id: &str) -> String {
        self.get_note_with_meta(course_id, lesson_id)
            .map(|n| n.content.clone())
            .unwrap_or_default()
    }

    /// The full note record, if one exists
    pub fn get_note_with_meta(&self, course_id: &str, lesson_id: &str) -> Option<&Note> {
        self.data.courses.get(course_id).and_then(|c| c.notes.get(lesson_id))
    }

    /// Remove a lesson's note
    pub fn delete_note(&mut self, course_id: &str, lesson_id: &str) -> Result<()> {
        let Some(course) = self.data.courses.get_mut(course_id) else {
            return Ok(());
        };

        if course.notes.remove(lesson_id).is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// Every non-empty note across all courses, most recently updated first.
    ///
    /// Notes whose trimmed content is empty are excluded.
    pub fn all_notes(&self) -> Vec<NoteEntry> {
        let mut entries: Vec<NoteEntry> = self
            .data
            .courses
            .iter()
            .flat_map(|(course_id, course)| {
                course.notes.iter().map(move |(lesson_id, note)| NoteEntry {
                    course_id: course_id.clone(),
                    lesson_id: lesson_id.clone(),
                    note: note.clone(),
                })
            })
            .filter(|entry| !entry.note.content.trim().is_empty())
            .collect();

        entries.sort_by_key(|entry| std::cmp::Reverse(entry.note.updated_at));
        entries
    }

    /// Record the lesson to resume from
    pub fn update_last_accessed(&mut self, course_id: &str, lesson_id: &str) -> Result<()> {
        let now = Utc::now().timestamp();
        let course = self.course_entry(course_id, now);
        course.last_accessed_lesson = Some(lesson_id.to_string());
        course.last_accessed_at = Some(now);
        self.save()
    }

    /// Advance the daily streak for today. Safe to call any number of times
    /// per day. Returns the streak after the update.
    pub fn update_streak(&mut self) -> Result<u32> {
        self.update_streak_on(Local::now().date_naive())
    }

    /// Streak transition for an explicit calendar date.
    ///
    /// Same day as the last update: no-op. The day after: increment. Any
    /// longer gap, or a first-ever visit: reset to 1. `longest_streak` only
    /// ever rises.
    pub fn update_streak_on(&mut self, today: NaiveDate) -> Result<u32> {
        let last_active = self
            .data
            .last_active_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        if last_active == Some(today) {
            return Ok(self.data.current_streak);
        }

        let continues = last_active.and_then(|d| d.succ_opt()) == Some(today);
        self.data.current_streak = if continues { self.data.current_streak + 1 } else { 1 };
        self.data.longest_streak = self.data.longest_streak.max(self.data.current_streak);
        self.data.last_active_date = Some(today.format("%Y-%m-%d").to_string());

        self.save()?;
        Ok(self.data.current_streak)
    }

    /// Append an achievement ID if absent. Returns whether it was new.
    pub fn unlock_course_achievement(
        &mut self,
        course_id: &str,
        achievement_id: &str,
    ) -> Result<bool> {
        let now = Utc::now().timestamp();
        let course = self.course_entry(course_id, now);

        if course.unlocked_achievements.insert(achievement_id.to_string()) {
            self.save()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Has this achievement been unlocked? False for unknown courses.
    pub fn has_course_achievement(&self, course_id: &str, achievement_id: &str) -> bool {
        self.data
            .courses
            .get(course_id)
            .is_some_and(|c| c.unlocked_achievements.contains(achievement_id))
    }

    /// Progress snapshot for a course. Unknown courses yield a default-shaped
    /// empty record, never an absence the caller has to handle.
    pub fn course_progress(&self, course_id: &str) -> CourseProgress {
        self.data.courses.get(course_id).cloned().unwrap_or_default()
    }

    /// Number of completed lessons in one course
    pub fn completed_lessons_count(&self, course_id: &str) -> usize {
        self.data.courses.get(course_id).map_or(0, |c| c.completed_lessons.len())
    }

    /// Rounded completion percentage, 0 when the course has no lessons
    pub fn course_completion_percentage(&self, course_id: &str, total_lessons: usize) -> u8 {
        if total_lessons == 0 {
            return 0;
        }
        let completed = self.completed_lessons_count(course_id);
        ((completed as f64 / total_lessons as f64) * 100.0).round() as u8
    }

    /// Completed lessons summed across every course
    pub fn total_completed_lessons(&self) -> usize {
        self.data.courses.values().map(|c| c.completed_lessons.len()).sum()
    }

    /// Number of non-empty notes in one course
    pub fn notes_count(&self, course_id: &str) -> usize {
        self.data
            .courses
            .get(course_id)
            .map_or(0, |c| c.notes.values().filter(|n| !n.content.trim().is_empty()).count())
    }

    /// Merge a partial settings update
    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<()> {
        self.data.settings.apply(update);
        self.save()
    }

    /// Replace everything with factory defaults. Irreversible and immediate.
    pub fn reset(&mut self) -> Result<()> {
        self.data = UserProgress::default();
        self.save()
    }

    /// Replace the whole record, used by import. The new record is persisted
    /// before this returns.
    pub fn replace(&mut self, data: UserProgress) -> Result<()> {
        self.data = data;
        self.save()
    }
}
