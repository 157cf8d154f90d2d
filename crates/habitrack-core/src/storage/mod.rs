mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, HabitDefaults, StatsConfig};
pub use database::HabitDb;

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::date::DayRange;
use crate::error::Result;
use crate::habit::{Badge, BadgeProposal, CheckIn};

/// Read/write surface the badge awarding flow needs from persistence.
///
/// Implementations must return at most one check-in per (habit, day).
pub trait HabitStore {
    /// Check-ins for a habit, optionally restricted to an inclusive day range.
    fn load_check_ins(&self, habit_id: &str, range: Option<DayRange>) -> Result<Vec<CheckIn>>;

    /// Names of the badges the habit already holds.
    fn load_existing_badge_names(&self, habit_id: &str) -> Result<BTreeSet<String>>;

    /// Persist a proposal, assigning its id and `earned_at = now`.
    fn save_badge(&self, habit_id: &str, proposal: &BadgeProposal) -> Result<Badge>;
}

/// Returns the habitrack data directory, creating it if needed.
///
/// `HABITRACK_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/habitrack/`, or `~/.config/habitrack-dev/` when
/// `HABITRACK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("HABITRACK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("HABITRACK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitrack-dev")
            } else {
                base_dir.join("habitrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
