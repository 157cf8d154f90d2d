//! # Habitrack Core Library
//!
//! This library provides the core logic for the Habitrack habit tracker.
//! Habits collect one check-in per calendar day; from that history the library
//! derives the current streak, a trailing completion rate and milestone badges.
//! The CLI binary is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Date normalization**: timestamps become local calendar-day keys
//! - **Derivation**: pure functions for streaks, completion rates, badges and
//!   chart history, all taking "today" as an explicit argument
//! - **Storage**: SQLite-backed habit store and TOML-based configuration
//! - **Awarding**: glue that evaluates badges against a store and saves them
//!
//! ## Key Components
//!
//! - [`calculate_streak`]: Current consecutive-day streak
//! - [`completion_rate`]: Trailing-window completion percentage
//! - [`evaluate_badges`]: Newly earned badge proposals
//! - [`HabitDb`]: Habit, check-in and badge persistence
//! - [`Config`]: Application configuration management

pub mod award;
pub mod badges;
pub mod completion;
pub mod date;
pub mod error;
pub mod habit;
pub mod progress;
pub mod storage;
pub mod streak;
pub mod summary;

pub use award::award_badges;
pub use badges::{evaluate_badges, BadgeKind};
pub use completion::{completion_rate, DEFAULT_WINDOW_DAYS};
pub use date::DayRange;
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use habit::{
    parse_check_ins, Badge, BadgeProposal, CheckIn, Habit, HabitFrequency, HabitUpdate,
    NewHabit, RawCheckIn,
};
pub use progress::{
    daily_history, weekly_completion, DayStatus, WeekCompletion, MAX_HISTORY_DAYS, MAX_HISTORY_WEEKS,
};
pub use storage::{Config, HabitDb, HabitStore};
pub use streak::calculate_streak;
pub use summary::{DashboardSummary, HabitProgress};
