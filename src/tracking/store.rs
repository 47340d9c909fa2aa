//! The study-time tracking store
//!
//! Tracks one open activity session at a time and folds closed sessions into
//! daily records, course stats, a bounded recent-activity log, and the single
//! authoritative total-study-time counter. Aggregates only ever derive from
//! wall-clock start/end deltas, never from UI tick counts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use super::model::{
    ActivityKind, ActivitySession, CourseStudyStats, DailyRecord, SessionContext, SessionOutcome,
    TrackingData,
};
use crate::paths;

/// Sessions shorter than this are rapid-navigation noise and are discarded
pub const MIN_SESSION_SECONDS: i64 = 5;

/// How many closed sessions the recent-activity log retains
const RECENT_ACTIVITY_CAP: usize = 100;

/// Totals for one day inside a week breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTotal {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Seconds studied that day
    pub total_seconds: i64,
}

/// Trailing-7-day summary
#[derive(Debug, Clone, Default)]
pub struct WeekStats {
    /// Seconds across the whole week
    pub total_seconds: i64,
    /// Seconds per activity kind across the week
    pub by_activity: std::collections::HashMap<ActivityKind, i64>,
    /// One entry per day, oldest first, zero-filled for idle days
    pub days: Vec<DayTotal>,
}

/// Trailing-30-day summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyStats {
    /// Seconds across the window
    pub total_seconds: i64,
    /// Days with any recorded activity
    pub active_days: u32,
    /// `total_seconds / active_days`, 0 when there were none
    pub average_seconds_per_active_day: i64,
}

/// Persisted study tracker with write-through semantics
#[derive(Debug)]
pub struct TrackingStore {
    data: TrackingData,
    path: PathBuf,
}

impl TrackingStore {
    /// Open the store at the default platform path
    pub fn open() -> Result<Self> {
        Self::open_at(paths::tracking_path()?)
    }

    /// Open the store at an explicit path
    pub fn open_at(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read tracking data from {:?}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse tracking.json")?
        } else {
            TrackingData::default()
        };

        Ok(Self { data, path })
    }

    /// Read access to the whole record
    pub fn data(&self) -> &TrackingData {
        &self.data
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(&self.data)
            .with_context(|| "Failed to serialize tracking data")?;

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write tracking data to {:?}", self.path))?;

        Ok(())
    }

    /// The open session, if any
    pub fn current_session(&self) -> Option<&ActivitySession> {
        self.data.current_session.as_ref()
    }

    /// Start a session, closing any session still open first.
    ///
    /// The close-then-open order is what keeps at-most-one-session true even
    /// under rapid context switches; the closed session is recorded (or
    /// discarded by the minimum-duration rule) before the new one exists.
    pub fn start_session(&mut self, kind: ActivityKind, context: SessionContext) -> Result<Uuid> {
        self.start_session_at(kind, context, Utc::now().timestamp())
    }

    /// Clock-injectable variant of [`start_session`](Self::start_session)
    pub fn start_session_at(
        &mut self,
        kind: ActivityKind,
        context: SessionContext,
        now: i64,
    ) -> Result<Uuid> {
        self.close_current_at(None, now)?;
        Ok(self.open_session(kind, context, now))
    }

    /// Open a session without touching any prior one. Callers should prefer
    /// [`start_session`](Self::start_session); this is the second half of its
    /// two-step transition.
    fn open_session(&mut self, kind: ActivityKind, context: SessionContext, now: i64) -> Uuid {
        let session = ActivitySession::open(kind, context, now);
        let id = session.id;
        tracing::debug!(?kind, %id, "session opened");
        self.data.current_session = Some(session);
        id
    }

    /// Merge late-arriving context into the open session. No-op when idle.
    pub fn update_current_session(&mut self, context: SessionContext) {
        if let Some(session) = self.data.current_session.as_mut() {
            session.context.merge(context);
        }
    }

    /// End the open session, attaching outcome data. Returns the recorded
    /// session, or `None` if there was nothing open or the session was too
    /// short to keep.
    pub fn end_session(&mut self, outcome: Option<SessionOutcome>) -> Result<Option<ActivitySession>> {
        self.end_session_at(outcome, Utc::now().timestamp())
    }

    /// Clock-injectable variant of [`end_session`](Self::end_session)
    pub fn end_session_at(
        &mut self,
        outcome: Option<SessionOutcome>,
        now: i64,
    ) -> Result<Option<ActivitySession>> {
        self.close_current_at(outcome, now)
    }

    /// First half of the two-step transition: close whatever is open.
    ///
    /// Computes the duration from wall-clock timestamps, discards sub-minimum
    /// sessions entirely, and folds everything else into the aggregates.
    fn close_current_at(
        &mut self,
        outcome: Option<SessionOutcome>,
        now: i64,
    ) -> Result<Option<ActivitySession>> {
        let Some(mut session) = self.data.current_session.take() else {
            return Ok(None);
        };

        let duration = now - session.started_at;
        if duration < MIN_SESSION_SECONDS {
            tracing::debug!(id = %session.id, duration, "discarding sub-minimum session");
            return Ok(None);
        }

        session.ended_at = Some(now);
        session.duration_seconds = duration;
        session.outcome = outcome;

        let day_key = date_of_timestamp(now).format("%Y-%m-%d").to_string();
        self.data.daily_records.entry(day_key).or_default().add_session(&session);

        if let Some(course_id) = session.context.course_id.clone() {
            self.data.course_stats.entry(course_id).or_default().add_session(&session);
        }

        self.data.recent_activity.insert(0, session.clone());
        self.data.recent_activity.truncate(RECENT_ACTIVITY_CAP);
        self.data.total_study_seconds += duration;

        tracing::info!(id = %session.id, kind = ?session.kind, duration, "session recorded");
        self.save()?;
        Ok(Some(session))
    }

    /// Today's aggregates, or an empty record
    pub fn today_stats(&self) -> DailyRecord {
        self.day_stats(Local::now().date_naive())
    }

    /// Aggregates for an explicit calendar day
    pub fn day_stats(&self, day: NaiveDate) -> DailyRecord {
        self.data
            .daily_records
            .get(&day.format("%Y-%m-%d").to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Trailing 7 calendar days including today, oldest day first
    pub fn week_stats(&self) -> WeekStats {
        self.week_stats_on(Local::now().date_naive())
    }

    /// Clock-injectable variant of [`week_stats`](Self::week_stats)
    pub fn week_stats_on(&self, today: NaiveDate) -> WeekStats {
        let mut stats = WeekStats::default();

        for offset in (0..7).rev() {
            let day = today - Days::new(offset);
            let key = day.format("%Y-%m-%d").to_string();

            let total = match self.data.daily_records.get(&key) {
                Some(record) => {
                    stats.total_seconds += record.total_seconds;
                    for (kind, seconds) in &record.by_activity {
                        *stats.by_activity.entry(*kind).or_default() += seconds;
                    }
                    record.total_seconds
                }
                None => 0,
            };

            stats.days.push(DayTotal { date: key, total_seconds: total });
        }

        stats
    }

    /// Trailing 30 calendar days including today
    pub fn monthly_stats(&self) -> MonthlyStats {
        self.monthly_stats_on(Local::now().date_naive())
    }

    /// Clock-injectable variant of [`monthly_stats`](Self::monthly_stats)
    pub fn monthly_stats_on(&self, today: NaiveDate) -> MonthlyStats {
        let mut total = 0;
        let mut active_days = 0;

        for offset in 0..30 {
            let key = (today - Days::new(offset)).format("%Y-%m-%d").to_string();
            if let Some(record) = self.data.daily_records.get(&key) {
                if record.total_seconds > 0 {
                    total += record.total_seconds;
                    active_days += 1;
                }
            }
        }

        MonthlyStats {
            total_seconds: total,
            active_days,
            average_seconds_per_active_day: if active_days > 0 {
                total / active_days as i64
            } else {
                0
            },
        }
    }

    /// Per-course totals; `None` for a course never studied
    pub fn course_stats(&self, course_id: &str) -> Option<&CourseStudyStats> {
        self.data.course_stats.get(course_id)
    }

    /// The one authoritative total across all recorded sessions
    pub fn total_study_seconds(&self) -> i64 {
        self.data.total_study_seconds
    }

    /// Recently closed sessions, newest first
    pub fn recent_activity(&self) -> &[ActivitySession] {
        &self.data.recent_activity
    }
}

/// Local calendar date of a unix timestamp; daily records are keyed by the
/// learner's own day boundaries, not UTC's.
fn date_of_timestamp(timestamp: i64) -> NaiveDate {
    Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| Local::now().date_naive())
}
