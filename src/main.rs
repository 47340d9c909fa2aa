use anyhow::Result;
use clap::{Parser, Subcommand};
use dojo::course::Catalog;
use dojo::export::{export_progress, import_progress};
use dojo::progress::ProgressStore;
use dojo::progress::achievements::streak_badges;
use dojo::tracking::TrackingStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dojo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed courses with completion
    Courses,
    /// Show detailed progress for one course
    Progress {
        /// Course ID or slug
        course: String,
    },
    /// Show study-time statistics
    Stats {
        /// Trailing 7 days instead of today
        #[arg(long)]
        week: bool,
        /// Trailing 30 days instead of today
        #[arg(long)]
        month: bool,
    },
    /// Export progress to a JSON file
    Export {
        /// Output path
        #[arg(short, long, default_value = "dojo-progress.json")]
        output: String,
    },
    /// Import progress from a JSON file, replacing current progress
    Import {
        /// Path to a previously exported file
        file: String,
    },
    /// Erase all progress and start over
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dojo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Courses => list_courses(),
        Commands::Progress { course } => show_progress(&course),
        Commands::Stats { week, month } => show_stats(week, month),
        Commands::Export { output } => {
            let store = ProgressStore::open()?;
            export_progress(&store, output.as_ref())?;
            println!("Exported progress to {}", output);
            Ok(())
        }
        Commands::Import { file } => {
            let mut store = ProgressStore::open()?;
            import_progress(&mut store, file.as_ref())?;
            println!("Imported progress from {}", file);
            Ok(())
        }
        Commands::Reset { yes } => {
            if !yes {
                println!("This erases all progress. Re-run with --yes to confirm.");
                return Ok(());
            }
            let mut store = ProgressStore::open()?;
            store.reset()?;
            println!("Progress reset.");
            Ok(())
        }
    }
}

fn list_courses() -> Result<()> {
    let catalog = Catalog::load()?;
    let store = ProgressStore::open()?;

    if catalog.courses().is_empty() {
        println!("No courses installed.");
        return Ok(());
    }

    for course in catalog.courses() {
        let total = course.total_lessons();
        let completed = store.completed_lessons_count(&course.id);
        let percent = store.course_completion_percentage(&course.id, total);
        println!("{:<40} {:>3}% ({}/{} lessons)", course.title, percent, completed, total);
    }
    Ok(())
}

fn show_progress(key: &str) -> Result<()> {
    let catalog = Catalog::load()?;
    let Some(course) = catalog.find(key) else {
        anyhow::bail!("No course matching '{}'. Try `dojo courses`.", key);
    };

    let store = ProgressStore::open()?;
    let tracking = TrackingStore::open()?;
    let progress = store.course_progress(&course.id);
    let total = course.total_lessons();

    println!("{} ({})", course.title, course.id);
    println!(
        "  Lessons:      {}/{} ({}%)",
        progress.completed_lessons.len(),
        total,
        store.course_completion_percentage(&course.id, total)
    );

    for module in &course.modules {
        if let Some(score) = progress.quiz_scores.get(&module.id) {
            println!("  Quiz {:<24} best {}%", module.title, score);
        }
    }

    println!("  Bookmarks:    {}", progress.bookmarks.len());
    println!("  Notes:        {}", store.notes_count(&course.id));
    println!(
        "  Achievements: {}/{}",
        progress.unlocked_achievements.len(),
        course.achievements.len()
    );

    if let Some(lesson_id) = &progress.last_accessed_lesson {
        if let Some(lesson) = course.find_lesson(lesson_id) {
            println!("  Resume at:    {}", lesson.title);
        }
    }

    if let Some(stats) = tracking.course_stats(&course.id) {
        println!(
            "  Study time:   {} over {} sessions",
            format_duration(stats.total_seconds),
            stats.session_count
        );
    }

    Ok(())
}

fn show_stats(week: bool, month: bool) -> Result<()> {
    let store = ProgressStore::open()?;
    let tracking = TrackingStore::open()?;

    println!(
        "Streak: {} days (best {})",
        store.data().current_streak,
        store.data().longest_streak
    );

    let earned: Vec<&str> = streak_badges(store.data().current_streak)
        .into_iter()
        .filter(|b| b.earned)
        .map(|b| b.title)
        .collect();
    if !earned.is_empty() {
        println!("Badges: {}", earned.join(", "));
    }

    if week {
        let stats = tracking.week_stats();
        println!("Last 7 days: {}", format_duration(stats.total_seconds));
        for day in &stats.days {
            println!("  {}  {}", day.date, format_duration(day.total_seconds));
        }
    } else if month {
        let stats = tracking.monthly_stats();
        println!("Last 30 days: {}", format_duration(stats.total_seconds));
        println!("Active days:  {}", stats.active_days);
        println!("Per active day: {}", format_duration(stats.average_seconds_per_active_day));
    } else {
        let today = tracking.today_stats();
        println!("Today: {}", format_duration(today.total_seconds));
        if today.quizzes_taken > 0 {
            println!("Quizzes: {} (avg {:.0}%)", today.quizzes_taken, today.quiz_average_score);
        }
        if today.focus_seconds > 0 {
            println!("Focus: {}", format_duration(today.focus_seconds));
        }
        println!("All time: {}", format_duration(tracking.total_study_seconds()));
    }

    Ok(())
}

fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", seconds)
    }
}
