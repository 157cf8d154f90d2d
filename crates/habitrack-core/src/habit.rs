//! Habit, check-in and badge records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date;
use crate::error::{Result, ValidationError};

/// How often a habit is meant to be performed.
///
/// Carried as metadata only; streaks and rates are always computed per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl HabitFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitFrequency::Daily => "daily",
            HabitFrequency::Weekly => "weekly",
            HabitFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitFrequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(HabitFrequency::Daily),
            "weekly" => Ok(HabitFrequency::Weekly),
            "monthly" => Ok(HabitFrequency::Monthly),
            other => Err(ValidationError::InvalidValue {
                field: "frequency".into(),
                message: format!("expected daily, weekly or monthly, got '{other}'"),
            }),
        }
    }
}

/// A tracked habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub color: String,
    pub icon: String,
    pub frequency: HabitFrequency,
    pub goal: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub color: String,
    pub icon: String,
    pub frequency: HabitFrequency,
    pub goal: u32,
}

impl NewHabit {
    /// A daily, goal-1 habit using the category's default icon.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let category = category.into();
        Self {
            name: name.into(),
            description: None,
            icon: default_icon_for_category(&category).to_string(),
            category,
            color: "blue".to_string(),
            frequency: HabitFrequency::Daily,
            goal: 1,
        }
    }

    /// # Errors
    /// Rejects blank names or categories and a zero goal.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyField("category"));
        }
        if self.goal == 0 {
            return Err(ValidationError::InvalidValue {
                field: "goal".into(),
                message: "goal must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Partial update for a habit. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub frequency: Option<HabitFrequency>,
    pub goal: Option<u32>,
}

impl HabitUpdate {
    /// Apply onto `habit`, validating the result.
    ///
    /// # Errors
    /// Same rules as [`NewHabit::validate`].
    pub fn apply(&self, habit: &mut Habit) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyField("name"));
            }
            habit.name = name.clone();
        }
        if let Some(category) = &self.category {
            if category.trim().is_empty() {
                return Err(ValidationError::EmptyField("category"));
            }
            habit.category = category.clone();
        }
        if let Some(goal) = self.goal {
            if goal == 0 {
                return Err(ValidationError::InvalidValue {
                    field: "goal".into(),
                    message: "goal must be at least 1".into(),
                });
            }
            habit.goal = goal;
        }
        if let Some(description) = &self.description {
            habit.description = Some(description.clone());
        }
        if let Some(color) = &self.color {
            habit.color = color.clone();
        }
        if let Some(icon) = &self.icon {
            habit.icon = icon.clone();
        }
        if let Some(frequency) = self.frequency {
            habit.frequency = frequency;
        }
        Ok(())
    }
}

/// Whether a habit was done on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub notes: Option<String>,
}

impl CheckIn {
    pub fn new(habit_id: impl Into<String>, date: NaiveDate, completed: bool) -> Self {
        Self {
            habit_id: habit_id.into(),
            date,
            completed,
            notes: None,
        }
    }
}

/// A check-in as it arrives from outside, with an unparsed timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCheckIn {
    pub habit_id: String,
    pub date: String,
    pub completed: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RawCheckIn {
    /// # Errors
    /// [`InvalidDate`](crate::CoreError::InvalidDate) if the timestamp cannot be normalized.
    pub fn normalize(&self) -> Result<CheckIn> {
        Ok(CheckIn {
            habit_id: self.habit_id.clone(),
            date: date::parse_day(&self.date)?,
            completed: self.completed,
            notes: self.notes.clone(),
        })
    }
}

/// Normalize a batch of raw check-ins, failing on the first bad date.
///
/// Nothing is skipped: one unparsable record fails the whole batch so that
/// streaks and rates are never computed from a partial history.
///
/// # Errors
/// The first [`InvalidDate`](crate::CoreError::InvalidDate) encountered.
pub fn parse_check_ins<'a, I>(raw: I) -> Result<Vec<CheckIn>>
where
    I: IntoIterator<Item = &'a RawCheckIn>,
{
    raw.into_iter().map(RawCheckIn::normalize).collect()
}

/// A milestone earned by a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub habit_id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub earned_at: DateTime<Utc>,
}

/// A badge the evaluator has decided to award but nobody has saved yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeProposal {
    pub name: String,
    pub description: String,
    pub icon: String,
}

/// Icon id for a well-known category, `target` otherwise.
pub fn default_icon_for_category(category: &str) -> &'static str {
    match category.trim().to_ascii_lowercase().as_str() {
        "health" => "heart",
        "fitness" => "dumbbell",
        "learning" => "book",
        "productivity" => "briefcase",
        "mindfulness" => "brain",
        "social" => "users",
        "finance" => "wallet",
        _ => "target",
    }
}
