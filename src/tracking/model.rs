//! Study-time tracking data shapes
//!
//! The on-disk format of `tracking.json`: closed activity sessions folded
//! into per-day records and per-course stats. The open session is transient
//! and never persisted.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of activity a session measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Lesson,
    Quiz,
    Flashcards,
    Notes,
    Focus,
    Review,
}

/// Where a session took place. All fields optional; later context (a lesson
/// title resolved after navigation settles) is merged in with [`merge`].
///
/// [`merge`]: SessionContext::merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    pub lesson_id: Option<String>,
    pub lesson_title: Option<String>,
}

impl SessionContext {
    /// Overlay `update` onto self; `None` fields leave existing values alone
    pub fn merge(&mut self, update: SessionContext) {
        if update.course_id.is_some() {
            self.course_id = update.course_id;
        }
        if update.course_name.is_some() {
            self.course_name = update.course_name;
        }
        if update.lesson_id.is_some() {
            self.lesson_id = update.lesson_id;
        }
        if update.lesson_title.is_some() {
            self.lesson_title = update.lesson_title;
        }
    }
}

/// Outcome data attached when a session closes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Quiz percentage score, for quiz sessions
    pub quiz_score: Option<u8>,
    /// Number of flashcards reviewed, for flashcard sessions
    pub flashcards_reviewed: Option<u32>,
}

/// One timed activity session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySession {
    /// Stable identifier
    pub id: Uuid,
    /// Activity kind
    pub kind: ActivityKind,
    /// Course/lesson context, merged in as it becomes known
    #[serde(flatten)]
    pub context: SessionContext,
    /// Unix timestamp when the session opened
    pub started_at: i64,
    /// Unix timestamp when the session closed; `None` while open
    pub ended_at: Option<i64>,
    /// Whole seconds between start and end; 0 while open
    pub duration_seconds: i64,
    /// Outcome data, attached only at close
    pub outcome: Option<SessionOutcome>,
}

impl ActivitySession {
    /// Open a new session starting at `now`
    pub fn open(kind: ActivityKind, context: SessionContext, now: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            context,
            started_at: now,
            ended_at: None,
            duration_seconds: 0,
            outcome: None,
        }
    }
}

/// Aggregated study activity for one calendar day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Sum of closed session durations
    pub total_seconds: i64,
    /// Seconds per activity kind
    pub by_activity: HashMap<ActivityKind, i64>,
    /// Seconds per course ID
    pub by_course: HashMap<String, i64>,
    /// Lessons that had a session that day
    pub lessons_viewed: HashSet<String>,
    /// Scored quiz sessions that day; the denominator of the running mean
    pub quizzes_taken: u32,
    /// Running mean of quiz scores
    pub quiz_average_score: f64,
    /// Seconds spent in focus sessions
    pub focus_seconds: i64,
    /// The closed sessions themselves
    pub sessions: Vec<ActivitySession>,
}

impl DailyRecord {
    /// Fold a closed session into this day's aggregates
    pub fn add_session(&mut self, session: &ActivitySession) {
        let duration = session.duration_seconds;
        self.total_seconds += duration;
        *self.by_activity.entry(session.kind).or_default() += duration;

        if let Some(course_id) = &session.context.course_id {
            *self.by_course.entry(course_id.clone()).or_default() += duration;
        }
        if let Some(lesson_id) = &session.context.lesson_id {
            self.lessons_viewed.insert(lesson_id.clone());
        }
        if session.kind == ActivityKind::Focus {
            self.focus_seconds += duration;
        }
        if session.kind == ActivityKind::Quiz {
            if let Some(score) = session.outcome.and_then(|o| o.quiz_score) {
                let n = self.quizzes_taken as f64;
                self.quiz_average_score = (self.quiz_average_score * n + score as f64) / (n + 1.0);
                self.quizzes_taken += 1;
            }
        }

        self.sessions.push(session.clone());
    }
}

/// Aggregated study activity for one course across all days
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseStudyStats {
    /// Sum of closed session durations
    pub total_seconds: i64,
    /// Closed sessions counted
    pub session_count: u32,
    /// Unix timestamp of the most recent close
    pub last_studied_at: i64,
    /// Lessons that have ever had a session
    pub lessons_viewed: HashSet<String>,
}

impl CourseStudyStats {
    /// Fold a closed session into the course totals
    pub fn add_session(&mut self, session: &ActivitySession) {
        self.total_seconds += session.duration_seconds;
        self.session_count += 1;
        if let Some(ended_at) = session.ended_at {
            self.last_studied_at = self.last_studied_at.max(ended_at);
        }
        if let Some(lesson_id) = &session.context.lesson_id {
            self.lessons_viewed.insert(lesson_id.clone());
        }
    }
}

/// Everything the tracker persists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingData {
    /// Per-day aggregates, keyed by `YYYY-MM-DD`
    pub daily_records: HashMap<String, DailyRecord>,
    /// Per-course aggregates
    pub course_stats: HashMap<String, CourseStudyStats>,
    /// The one authoritative total across all recorded sessions
    pub total_study_seconds: i64,
    /// Recently closed sessions, newest first, capped
    pub recent_activity: Vec<ActivitySession>,
    /// The open session; always idle after a reload
    #[serde(skip)]
    pub current_session: Option<ActivitySession>,
}
