//! The learning hub
//!
//! Composition root for the state layer: owns the progress store and the
//! study tracker, and drives the flows a front end triggers — opening and
//! completing lessons, finishing quizzes, reviewing flashcards, editing
//! notes, and pausing/resuming when the app loses focus. After mutations
//! that can unlock achievements it evaluates them on a fresh snapshot and
//! writes the new unlocks back.

use anyhow::Result;

use crate::course::model::Course;
use crate::progress::achievements::{ProgressSnapshot, check_achievements};
use crate::progress::store::ProgressStore;
use crate::tracking::model::{ActivityKind, SessionContext, SessionOutcome};
use crate::tracking::store::TrackingStore;

/// Result of finishing a quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    /// Rounded percentage score for this attempt
    pub score: u8,
    /// Achievement IDs unlocked by this attempt
    pub newly_unlocked: Vec<String>,
}

/// The state layer behind a learning front end
#[derive(Debug)]
pub struct LearningHub {
    progress: ProgressStore,
    tracking: TrackingStore,
    /// Session context saved across a pause, to reopen on resume
    paused: Option<(ActivityKind, SessionContext)>,
}

impl LearningHub {
    /// Open both stores at their default platform paths
    pub fn open() -> Result<Self> {
        Ok(Self { progress: ProgressStore::open()?, tracking: TrackingStore::open()?, paused: None })
    }

    /// Build a hub from already-opened stores
    pub fn new(progress: ProgressStore, tracking: TrackingStore) -> Self {
        Self { progress, tracking, paused: None }
    }

    /// The progress store
    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Mutable access to the progress store
    pub fn progress_mut(&mut self) -> &mut ProgressStore {
        &mut self.progress
    }

    /// The study tracker
    pub fn tracking(&self) -> &TrackingStore {
        &self.tracking
    }

    /// Mutable access to the study tracker
    pub fn tracking_mut(&mut self) -> &mut TrackingStore {
        &mut self.tracking
    }

    /// The consolidated total study time in seconds
    pub fn total_study_seconds(&self) -> i64 {
        self.tracking.total_study_seconds()
    }

    fn course_context(course: &Course, lesson_id: Option<&str>) -> SessionContext {
        SessionContext {
            course_id: Some(course.id.clone()),
            course_name: Some(course.title.clone()),
            lesson_id: lesson_id.map(String::from),
            lesson_title: lesson_id
                .and_then(|id| course.find_lesson(id))
                .map(|l| l.title.clone()),
        }
    }

    /// Navigate to a lesson: record the resume point and start a lesson
    /// session, closing whatever session was open.
    pub fn open_lesson(&mut self, course: &Course, lesson_id: &str) -> Result<()> {
        self.progress.update_last_accessed(&course.id, lesson_id)?;
        self.tracking
            .start_session(ActivityKind::Lesson, Self::course_context(course, Some(lesson_id)))?;
        Ok(())
    }

    /// Mark a lesson complete, touch the streak, and unlock anything newly
    /// earned. Returns the newly unlocked achievement IDs.
    pub fn complete_lesson(&mut self, course: &Course, lesson_id: &str) -> Result<Vec<String>> {
        self.progress.mark_lesson_complete(&course.id, lesson_id)?;
        self.progress.update_streak()?;
        self.refresh_achievements(course, false)
    }

    /// Undo a lesson completion
    pub fn uncomplete_lesson(&mut self, course: &Course, lesson_id: &str) -> Result<()> {
        self.progress.unmark_lesson_complete(&course.id, lesson_id)
    }

    /// Begin a quiz session for a module
    pub fn start_quiz(&mut self, course: &Course) -> Result<()> {
        self.tracking.start_session(ActivityKind::Quiz, Self::course_context(course, None))?;
        Ok(())
    }

    /// Finish a quiz: store the score (best-per-module), close the quiz
    /// session with the score attached, and evaluate achievements.
    pub fn finish_quiz(
        &mut self,
        course: &Course,
        module_id: &str,
        correct: usize,
        total: usize,
    ) -> Result<QuizOutcome> {
        let score = if total == 0 {
            0
        } else {
            ((correct as f64 / total as f64) * 100.0).round() as u8
        };

        self.progress.update_quiz_score(&course.id, module_id, score)?;
        self.tracking.end_session(Some(SessionOutcome {
            quiz_score: Some(score),
            ..Default::default()
        }))?;
        self.progress.update_streak()?;

        let newly_unlocked = self.refresh_achievements(course, false)?;
        Ok(QuizOutcome { score, newly_unlocked })
    }

    /// Begin a flashcard review session
    pub fn start_flashcards(&mut self, course: &Course) -> Result<()> {
        self.tracking.start_session(ActivityKind::Flashcards, Self::course_context(course, None))?;
        Ok(())
    }

    /// Finish a flashcard review: close the session with the count attached
    /// and evaluate achievements, counting a full-deck review.
    pub fn finish_flashcards(
        &mut self,
        course: &Course,
        reviewed: u32,
        reviewed_all: bool,
    ) -> Result<Vec<String>> {
        self.tracking.end_session(Some(SessionOutcome {
            flashcards_reviewed: Some(reviewed),
            ..Default::default()
        }))?;
        self.progress.update_streak()?;
        self.refresh_achievements(course, reviewed_all)
    }

    /// Save a note and evaluate achievements (a first note can unlock one)
    pub fn save_note(
        &mut self,
        course: &Course,
        lesson_id: &str,
        content: &str,
    ) -> Result<Vec<String>> {
        self.progress.save_note(&course.id, lesson_id, content)?;
        self.refresh_achievements(course, false)
    }

    /// Begin a distraction-free focus session
    pub fn start_focus(&mut self, course: Option<&Course>) -> Result<()> {
        let context = course.map(|c| Self::course_context(c, None)).unwrap_or_default();
        self.tracking.start_session(ActivityKind::Focus, context)?;
        Ok(())
    }

    /// End the focus session
    pub fn end_focus(&mut self) -> Result<()> {
        self.tracking.end_session(None)?;
        Ok(())
    }

    /// The app lost focus or was suspended: commit the elapsed time now.
    /// Hidden time is never counted.
    pub fn pause(&mut self) -> Result<()> {
        if let Some(session) = self.tracking.current_session() {
            self.paused = Some((session.kind, session.context.clone()));
            self.tracking.end_session(None)?;
        }
        Ok(())
    }

    /// The app is visible again: reopen a session with the context saved at
    /// pause time. One logical viewing period may therefore span several
    /// recorded sessions, each subject to the minimum-duration rule.
    pub fn resume(&mut self) -> Result<()> {
        if let Some((kind, context)) = self.paused.take() {
            self.tracking.start_session(kind, context)?;
        }
        Ok(())
    }

    /// Evaluate the course's achievements against a fresh snapshot and write
    /// back every new unlock. Returns the newly unlocked IDs.
    fn refresh_achievements(
        &mut self,
        course: &Course,
        flashcards_reviewed: bool,
    ) -> Result<Vec<String>> {
        let snapshot = self.progress.course_progress(&course.id);
        let checks = check_achievements(course, ProgressSnapshot {
            completed_lessons: &snapshot.completed_lessons,
            quiz_scores: &snapshot.quiz_scores,
            notes_count: self.progress.notes_count(&course.id),
            unlocked: &snapshot.unlocked_achievements,
            flashcards_reviewed,
        });

        let mut newly_unlocked = Vec::new();
        for check in checks {
            if check.newly_unlocked {
                self.progress.unlock_course_achievement(&course.id, &check.achievement_id)?;
                tracing::info!(course = %course.id, achievement = %check.achievement_id, "achievement unlocked");
                newly_unlocked.push(check.achievement_id);
            }
        }
        Ok(newly_unlocked)
    }
}
