//! Habit management commands for CLI.

use clap::Subcommand;
use habitrack_core::habit::default_icon_for_category;
use habitrack_core::{Config, HabitDb, HabitFrequency, HabitUpdate, NewHabit};
use serde::Serialize;

use super::print_json;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Category (health, fitness, learning, productivity, ...)
        #[arg(long)]
        category: String,
        /// Habit description
        #[arg(long)]
        description: Option<String>,
        /// Display color (default from config)
        #[arg(long)]
        color: Option<String>,
        /// Icon id (default derived from the category)
        #[arg(long)]
        icon: Option<String>,
        /// daily, weekly or monthly (default from config)
        #[arg(long)]
        frequency: Option<HabitFrequency>,
        /// Target count per period (default from config)
        #[arg(long)]
        goal: Option<u32>,
    },
    /// List habits
    List {
        /// Only habits in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a habit with its check-ins and badges
    Show {
        /// Habit ID
        id: String,
    },
    /// Update a habit
    Update {
        /// Habit ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        frequency: Option<HabitFrequency>,
        #[arg(long)]
        goal: Option<u32>,
    },
    /// Delete a habit with all its check-ins and badges
    Delete {
        /// Habit ID
        id: String,
    },
}

#[derive(Serialize)]
struct HabitDetail {
    #[serde(flatten)]
    habit: habitrack_core::Habit,
    check_ins: Vec<habitrack_core::CheckIn>,
    badges: Vec<habitrack_core::Badge>,
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = HabitDb::open()?;

    match action {
        HabitAction::Add {
            name,
            category,
            description,
            color,
            icon,
            frequency,
            goal,
        } => {
            let defaults = Config::load_or_default().habits;
            let new = NewHabit {
                name,
                description,
                icon: icon.unwrap_or_else(|| default_icon_for_category(&category).to_string()),
                category,
                color: color.unwrap_or(defaults.default_color),
                frequency: frequency.unwrap_or(defaults.default_frequency),
                goal: goal.unwrap_or(defaults.default_goal),
            };
            let habit = db.create_habit(&new)?;
            eprintln!("Habit created: {}", habit.id);
            print_json(&habit)?;
        }
        HabitAction::List { category } => {
            let habits = db.list_habits(category.as_deref())?;
            print_json(&habits)?;
        }
        HabitAction::Show { id } => {
            let detail = HabitDetail {
                habit: db.get_habit(&id)?,
                check_ins: db.list_check_ins(&id, None)?,
                badges: db.list_badges(&id)?,
            };
            print_json(&detail)?;
        }
        HabitAction::Update {
            id,
            name,
            category,
            description,
            color,
            icon,
            frequency,
            goal,
        } => {
            let update = HabitUpdate {
                name,
                description,
                category,
                color,
                icon,
                frequency,
                goal,
            };
            let habit = db.update_habit(&id, &update)?;
            eprintln!("Habit updated: {id}");
            print_json(&habit)?;
        }
        HabitAction::Delete { id } => {
            db.delete_habit(&id)?;
            eprintln!("Habit deleted: {id}");
        }
    }
    Ok(())
}
