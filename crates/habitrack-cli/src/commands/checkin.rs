//! Daily check-in command for CLI.

use clap::Args;
use habitrack_core::{award_badges, HabitDb};
use serde::Serialize;

use super::{day_or_today, print_json};

#[derive(Args)]
pub struct CheckinArgs {
    /// Habit ID
    pub habit_id: String,
    /// Day to record (YYYY-MM-DD or RFC 3339; default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Record the day as not done
    #[arg(long)]
    pub missed: bool,
    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Evaluate badges as of this day (default: today, whatever --date is)
    #[arg(long)]
    pub today: Option<String>,
}

#[derive(Serialize)]
struct CheckinOutcome {
    check_in: habitrack_core::CheckIn,
    new_badges: Vec<habitrack_core::Badge>,
}

pub fn run(args: CheckinArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = HabitDb::open()?;
    let day = day_or_today(args.date.as_deref())?;
    let today = day_or_today(args.today.as_deref())?;

    let check_in = db.upsert_check_in(&args.habit_id, day, !args.missed, args.notes.as_deref())?;
    let new_badges = award_badges(&db, &args.habit_id, today)?;
    for badge in &new_badges {
        eprintln!("Badge earned: {} ({})", badge.name, badge.description);
    }

    print_json(&CheckinOutcome {
        check_in,
        new_badges,
    })
}
