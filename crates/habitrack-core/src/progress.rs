//! Day-by-day and week-by-week completion history for charts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::date::days_back;
use crate::error::ValidationError;
use crate::habit::CheckIn;

/// Longest daily history that can be requested (about ten years).
pub const MAX_HISTORY_DAYS: u32 = 3660;
/// Longest weekly history that can be requested (about ten years).
pub const MAX_HISTORY_WEEKS: u32 = 520;

fn check_span(field: &str, requested: u32, max: u32) -> Result<(), ValidationError> {
    if requested > max {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("at most {max} allowed, got {requested}"),
        });
    }
    Ok(())
}

/// One day of a habit's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    pub date: NaiveDate,
    /// A check-in exists for this day
    pub recorded: bool,
    /// The check-in exists and is completed
    pub completed: bool,
}

/// Completion for a 7-day bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCompletion {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub completed: u32,
    /// `completed / 7`, rounded half up
    pub percentage: u8,
}

/// The last `days` days ending at `today`, oldest first.
///
/// # Errors
/// [`ValidationError::InvalidValue`] when `days` exceeds [`MAX_HISTORY_DAYS`].
pub fn daily_history(
    check_ins: &[CheckIn],
    today: NaiveDate,
    days: u32,
) -> Result<Vec<DayStatus>, ValidationError> {
    check_span("days", days, MAX_HISTORY_DAYS)?;
    let by_day: HashMap<NaiveDate, bool> =
        check_ins.iter().map(|c| (c.date, c.completed)).collect();

    Ok((0..days)
        .rev()
        .map(|ago| {
            let date = days_back(today, ago);
            let status = by_day.get(&date).copied();
            DayStatus {
                date,
                recorded: status.is_some(),
                completed: status.unwrap_or(false),
            }
        })
        .collect())
}

/// `weeks` consecutive 7-day buckets, the newest ending at `today`, oldest first.
///
/// The percentage is out of all seven days, recorded or not.
///
/// # Errors
/// [`ValidationError::InvalidValue`] when `weeks` exceeds [`MAX_HISTORY_WEEKS`].
pub fn weekly_completion(
    check_ins: &[CheckIn],
    today: NaiveDate,
    weeks: u32,
) -> Result<Vec<WeekCompletion>, ValidationError> {
    check_span("weeks", weeks, MAX_HISTORY_WEEKS)?;
    Ok((0..weeks)
        .rev()
        .map(|week| {
            let end = days_back(today, week.saturating_mul(7));
            let start = days_back(end, 6);
            let completed = check_ins
                .iter()
                .filter(|c| c.completed && start <= c.date && c.date <= end)
                .count() as u32;
            WeekCompletion {
                start,
                end,
                completed,
                percentage: ((completed * 200 + 7) / 14).min(100) as u8,
            }
        })
        .collect())
}
