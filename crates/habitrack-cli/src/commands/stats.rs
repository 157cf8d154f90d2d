use clap::Subcommand;
use habitrack_core::{
    daily_history, weekly_completion, Config, DashboardSummary, HabitDb, HabitProgress,
};
use serde::Serialize;

use super::{day_or_today, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Streak and completion rate for one habit
    Habit {
        /// Habit ID
        id: String,
        /// Compute as of this day (default: today)
        #[arg(long)]
        today: Option<String>,
        /// Completion-rate window in days (default from config)
        #[arg(long)]
        window: Option<u32>,
    },
    /// Totals across all habits
    Dashboard {
        /// Compute as of this day (default: today)
        #[arg(long)]
        today: Option<String>,
    },
    /// Day-by-day completion ending today
    History {
        /// Habit ID
        id: String,
        #[arg(long)]
        today: Option<String>,
        /// Number of days (default from config)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Completion per trailing 7-day bucket
    Weekly {
        /// Habit ID
        id: String,
        #[arg(long)]
        today: Option<String>,
        /// Number of weeks (default from config)
        #[arg(long)]
        weeks: Option<u32>,
    },
}

#[derive(Serialize)]
struct Dashboard {
    #[serde(flatten)]
    summary: DashboardSummary,
    habits: Vec<HabitProgress>,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = HabitDb::open()?;
    let config = Config::load_or_default().stats;

    match action {
        StatsAction::Habit { id, today, window } => {
            let today = day_or_today(today.as_deref())?;
            let habit = db.get_habit(&id)?;
            let progress = HabitProgress::compute(
                &habit,
                &db.list_check_ins(&id, None)?,
                &db.list_badges(&id)?,
                today,
                window.unwrap_or(config.completion_window_days),
            );
            print_json(&progress)?;
        }
        StatsAction::Dashboard { today } => {
            let today = day_or_today(today.as_deref())?;
            let mut habits = Vec::new();
            for habit in db.list_habits(None)? {
                habits.push(HabitProgress::compute(
                    &habit,
                    &db.list_check_ins(&habit.id, None)?,
                    &db.list_badges(&habit.id)?,
                    today,
                    config.completion_window_days,
                ));
            }
            print_json(&Dashboard {
                summary: DashboardSummary::from_progress(&habits),
                habits,
            })?;
        }
        StatsAction::History { id, today, days } => {
            db.get_habit(&id)?;
            let today = day_or_today(today.as_deref())?;
            let check_ins = db.list_check_ins(&id, None)?;
            let history = daily_history(&check_ins, today, days.unwrap_or(config.history_days))?;
            print_json(&history)?;
        }
        StatsAction::Weekly { id, today, weeks } => {
            db.get_habit(&id)?;
            let today = day_or_today(today.as_deref())?;
            let check_ins = db.list_check_ins(&id, None)?;
            let weeks = weekly_completion(&check_ins, today, weeks.unwrap_or(config.history_weeks))?;
            print_json(&weeks)?;
        }
    }
    Ok(())
}
