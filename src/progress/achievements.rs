//! Achievement evaluation
//!
//! A pure layer: given a course's achievement definitions and a snapshot of
//! the learner's progress, decide which achievements newly qualify. The
//! evaluator never persists anything; callers write unlocks back through the
//! progress store. Requirements are a closed enum so that adding a new kind
//! is a compile-time decision, and course content carrying an unknown tag
//! fails at catalog load rather than silently never unlocking.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::course::model::Course;

/// What must be true for a course achievement to unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementRequirement {
    /// At least one lesson completed
    #[serde(rename = "complete-first")]
    CompleteFirst,
    /// At least half of the course's lessons completed
    #[serde(rename = "complete-50")]
    CompleteHalf,
    /// Every lesson completed
    #[serde(rename = "complete-all")]
    CompleteAll,
    /// Any module quiz scored exactly 100
    #[serde(rename = "score-100")]
    PerfectScore,
    /// Every module that has a quiz scored exactly 100
    #[serde(rename = "all-perfect")]
    AllPerfect,
    /// Every flashcard in the course reviewed
    #[serde(rename = "review-all-flashcards")]
    ReviewAllFlashcards,
    /// At least one non-empty note written
    #[serde(rename = "first-note")]
    FirstNote,
}

/// Snapshot of a learner's standing in one course, as the evaluator sees it
#[derive(Debug, Clone, Copy)]
pub struct ProgressSnapshot<'a> {
    /// Completed lesson IDs
    pub completed_lessons: &'a HashSet<String>,
    /// Best quiz score per module ID
    pub quiz_scores: &'a HashMap<String, u8>,
    /// Number of non-empty notes in this course
    pub notes_count: usize,
    /// Achievement IDs already unlocked
    pub unlocked: &'a HashSet<String>,
    /// Has the learner reviewed every flashcard at least once?
    pub flashcards_reviewed: bool,
}

/// Verdict for one not-yet-unlocked achievement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementCheck {
    /// Achievement ID from the course definition
    pub achievement_id: String,
    /// Did the requirement become satisfied?
    pub newly_unlocked: bool,
}

/// Evaluate every achievement on the course that is not already unlocked.
///
/// Already-unlocked achievements are skipped entirely and never reappear in
/// the result. Calling twice with identical inputs yields identical output.
pub fn check_achievements(course: &Course, snapshot: ProgressSnapshot<'_>) -> Vec<AchievementCheck> {
    course
        .achievements
        .iter()
        .filter(|a| !snapshot.unlocked.contains(&a.id))
        .map(|a| AchievementCheck {
            achievement_id: a.id.clone(),
            newly_unlocked: requirement_met(a.requirement, course, &snapshot),
        })
        .collect()
}

fn requirement_met(
    requirement: AchievementRequirement,
    course: &Course,
    snapshot: &ProgressSnapshot<'_>,
) -> bool {
    let total = course.total_lessons();
    let completed = snapshot.completed_lessons.len();

    match requirement {
        AchievementRequirement::CompleteFirst => completed >= 1,
        AchievementRequirement::CompleteHalf => total > 0 && completed * 2 >= total,
        AchievementRequirement::CompleteAll => total > 0 && completed == total,
        AchievementRequirement::PerfectScore => {
            snapshot.quiz_scores.values().any(|&score| score == 100)
        }
        AchievementRequirement::AllPerfect => {
            let quizzed = course.module_ids_with_quiz();
            !quizzed.is_empty()
                && quizzed
                    .iter()
                    .all(|module_id| snapshot.quiz_scores.get(*module_id) == Some(&100))
        }
        AchievementRequirement::ReviewAllFlashcards => snapshot.flashcards_reviewed,
        AchievementRequirement::FirstNote => snapshot.notes_count >= 1,
    }
}

/// A global streak badge, recomputed live from the streak counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakBadge {
    /// Consecutive days required
    pub days: u32,
    /// Badge title
    pub title: &'static str,
    /// Is the current streak at or past the threshold?
    pub earned: bool,
}

const STREAK_MILESTONES: &[(u32, &str)] = &[
    (3, "On a Roll"),
    (7, "Week Warrior"),
    (14, "Two Weeks Strong"),
    (30, "Monthly Master"),
    (60, "Deep Habit"),
    (100, "Centurion"),
];

/// Streak badges with their earned state for the given streak length.
///
/// These are never persisted; they are derived from `current_streak` every
/// time they are displayed.
pub fn streak_badges(current_streak: u32) -> Vec<StreakBadge> {
    STREAK_MILESTONES
        .iter()
        .map(|&(days, title)| StreakBadge { days, title, earned: current_streak >= days })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::model::{CourseAchievement, Difficulty, Lesson, Module, QuizQuestion};

    fn lesson(id: &str) -> Lesson {
        Lesson {
            id: id.into(),
            title: id.into(),
            content: String::new(),
            objectives: Vec::new(),
            key_points: Vec::new(),
            reading_time_minutes: None,
            examples: Vec::new(),
        }
    }

    fn question(id: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.into(),
            prompt: "?".into(),
            options: vec!["a".into(), "b".into()],
            answer: 0,
            explanation: None,
        }
    }

    fn achievement(id: &str, requirement: AchievementRequirement) -> CourseAchievement {
        CourseAchievement {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            icon: "star".into(),
            requirement,
        }
    }

    /// Two modules, four lessons, one quizzed module.
    fn course_with(achievements: Vec<CourseAchievement>) -> Course {
        Course {
            id: "c1".into(),
            slug: "c1".into(),
            title: "Course".into(),
            category: "test".into(),
            difficulty: Difficulty::Beginner,
            estimated_hours: 1.0,
            modules: vec![
                Module {
                    id: "m1".into(),
                    title: "M1".into(),
                    lessons: vec![lesson("l1"), lesson("l2")],
                    quiz: vec![question("q1")],
                },
                Module {
                    id: "m2".into(),
                    title: "M2".into(),
                    lessons: vec![lesson("l3"), lesson("l4")],
                    quiz: Vec::new(),
                },
            ],
            reference: Vec::new(),
            flashcards: Vec::new(),
            achievements,
        }
    }

    fn snapshot<'a>(
        completed: &'a HashSet<String>,
        scores: &'a HashMap<String, u8>,
        unlocked: &'a HashSet<String>,
    ) -> ProgressSnapshot<'a> {
        ProgressSnapshot {
            completed_lessons: completed,
            quiz_scores: scores,
            notes_count: 0,
            unlocked,
            flashcards_reviewed: false,
        }
    }

    #[test]
    fn complete_first_needs_one_lesson() {
        let course = course_with(vec![achievement("first", AchievementRequirement::CompleteFirst)]);
        let scores = HashMap::new();
        let unlocked = HashSet::new();

        let empty = HashSet::new();
        let checks = check_achievements(&course, snapshot(&empty, &scores, &unlocked));
        assert_eq!(checks, vec![AchievementCheck {
            achievement_id: "first".into(),
            newly_unlocked: false
        }]);

        let one: HashSet<String> = ["l1".to_string()].into();
        let checks = check_achievements(&course, snapshot(&one, &scores, &unlocked));
        assert!(checks[0].newly_unlocked);
    }

    #[test]
    fn complete_half_rounds_up_membership() {
        let course = course_with(vec![achievement("half", AchievementRequirement::CompleteHalf)]);
        let scores = HashMap::new();
        let unlocked = HashSet::new();

        let one: HashSet<String> = ["l1".to_string()].into();
        assert!(!check_achievements(&course, snapshot(&one, &scores, &unlocked))[0].newly_unlocked);

        let two: HashSet<String> = ["l1".to_string(), "l2".to_string()].into();
        assert!(check_achievements(&course, snapshot(&two, &scores, &unlocked))[0].newly_unlocked);
    }

    #[test]
    fn complete_all_fires_exactly_at_full_count() {
        let course = course_with(vec![achievement("all", AchievementRequirement::CompleteAll)]);
        let scores = HashMap::new();
        let unlocked = HashSet::new();

        let three: HashSet<String> =
            ["l1".to_string(), "l2".to_string(), "l3".to_string()].into();
        assert!(
            !check_achievements(&course, snapshot(&three, &scores, &unlocked))[0].newly_unlocked
        );

        let four: HashSet<String> =
            ["l1".to_string(), "l2".to_string(), "l3".to_string(), "l4".to_string()].into();
        assert!(check_achievements(&course, snapshot(&four, &scores, &unlocked))[0].newly_unlocked);
    }

    #[test]
    fn perfect_score_matches_any_module() {
        let course = course_with(vec![achievement("hundred", AchievementRequirement::PerfectScore)]);
        let completed = HashSet::new();
        let unlocked = HashSet::new();

        let mut scores = HashMap::new();
        scores.insert("m1".to_string(), 90u8);
        assert!(
            !check_achievements(&course, snapshot(&completed, &scores, &unlocked))[0]
                .newly_unlocked
        );

        scores.insert("m1".to_string(), 100u8);
        assert!(
            check_achievements(&course, snapshot(&completed, &scores, &unlocked))[0].newly_unlocked
        );
    }

    #[test]
    fn all_perfect_only_counts_quizzed_modules() {
        let course = course_with(vec![achievement("ace", AchievementRequirement::AllPerfect)]);
        let completed = HashSet::new();
        let unlocked = HashSet::new();

        // m2 has no quiz, so a perfect m1 is enough
        let mut scores = HashMap::new();
        scores.insert("m1".to_string(), 100u8);
        assert!(
            check_achievements(&course, snapshot(&completed, &scores, &unlocked))[0].newly_unlocked
        );
    }

    #[test]
    fn all_perfect_is_vacuously_false_without_quizzes() {
        let mut course = course_with(vec![achievement("ace", AchievementRequirement::AllPerfect)]);
        course.modules[0].quiz.clear();
        let completed = HashSet::new();
        let scores = HashMap::new();
        let unlocked = HashSet::new();

        assert!(
            !check_achievements(&course, snapshot(&completed, &scores, &unlocked))[0]
                .newly_unlocked
        );
    }

    #[test]
    fn first_note_and_flashcards_use_caller_inputs() {
        let course = course_with(vec![
            achievement("note", AchievementRequirement::FirstNote),
            achievement("cards", AchievementRequirement::ReviewAllFlashcards),
        ]);
        let completed = HashSet::new();
        let scores = HashMap::new();
        let unlocked = HashSet::new();

        let mut snap = snapshot(&completed, &scores, &unlocked);
        snap.notes_count = 1;
        snap.flashcards_reviewed = true;

        let checks = check_achievements(&course, snap);
        assert!(checks.iter().all(|c| c.newly_unlocked));
    }

    #[test]
    fn already_unlocked_achievements_are_skipped_entirely() {
        let course = course_with(vec![
            achievement("first", AchievementRequirement::CompleteFirst),
            achievement("all", AchievementRequirement::CompleteAll),
        ]);
        let completed: HashSet<String> = ["l1".to_string()].into();
        let scores = HashMap::new();
        let unlocked: HashSet<String> = ["first".to_string()].into();

        let checks = check_achievements(&course, snapshot(&completed, &scores, &unlocked));
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].achievement_id, "all");
    }

    #[test]
    fn evaluation_is_pure() {
        let course = course_with(vec![achievement("first", AchievementRequirement::CompleteFirst)]);
        let completed: HashSet<String> = ["l1".to_string()].into();
        let scores = HashMap::new();
        let unlocked = HashSet::new();

        let a = check_achievements(&course, snapshot(&completed, &scores, &unlocked));
        let b = check_achievements(&course, snapshot(&completed, &scores, &unlocked));
        assert_eq!(a, b);
    }

    #[test]
    fn requirement_tags_round_trip() {
        let json = serde_json::to_string(&AchievementRequirement::CompleteHalf).unwrap();
        assert_eq!(json, "\"complete-50\"");

        let parsed: AchievementRequirement = serde_json::from_str("\"score-100\"").unwrap();
        assert_eq!(parsed, AchievementRequirement::PerfectScore);
    }

    #[test]
    fn unknown_requirement_tag_is_a_parse_error() {
        let result: Result<AchievementRequirement, _> = serde_json::from_str("\"dance-party\"");
        assert!(result.is_err());
    }

    #[test]
    fn streak_badges_compare_against_thresholds() {
        let badges = streak_badges(7);
        assert!(badges.iter().find(|b| b.days == 3).unwrap().earned);
        assert!(badges.iter().find(|b| b.days == 7).unwrap().earned);
        assert!(!badges.iter().find(|b| b.days == 14).unwrap().earned);
    }
}
