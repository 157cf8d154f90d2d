use clap::Subcommand;
use habitrack_core::{award_badges, HabitDb};

use super::{day_or_today, print_json};

#[derive(Subcommand)]
pub enum BadgeAction {
    /// Badges a habit has earned
    List {
        /// Habit ID
        habit_id: String,
    },
    /// Award any badges a habit has newly earned
    Evaluate {
        /// Habit ID
        habit_id: String,
        /// Evaluate as of this day (default: today)
        #[arg(long)]
        today: Option<String>,
    },
}

pub fn run(action: BadgeAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = HabitDb::open()?;

    match action {
        BadgeAction::List { habit_id } => {
            db.get_habit(&habit_id)?;
            print_json(&db.list_badges(&habit_id)?)?;
        }
        BadgeAction::Evaluate { habit_id, today } => {
            db.get_habit(&habit_id)?;
            let today = day_or_today(today.as_deref())?;
            print_json(&award_badges(&db, &habit_id, today)?)?;
        }
    }
    Ok(())
}
