//! Calendar-day normalization.
//!
//! Every check-in is keyed by the local calendar day it falls on. Instants are
//! converted into a reference zone and truncated to the start of that day, so
//! two timestamps share a key iff they land on the same day in that zone.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};

/// Storage and display format of a day key.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Truncate an instant to its calendar day in `zone`.
pub fn normalize<Tz: TimeZone, Z: TimeZone>(ts: &DateTime<Tz>, zone: &Z) -> NaiveDate {
    ts.with_timezone(zone).date_naive()
}

/// Parse a timestamp and normalize it to a day in the system's local zone.
///
/// # Errors
/// Returns [`CoreError::InvalidDate`] if `raw` is not a recognised timestamp.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    parse_day_in(raw, &Local)
}

/// Parse a timestamp and normalize it to a day in `zone`.
///
/// Accepted forms:
/// - RFC 3339 instants (`2024-03-05T23:30:00Z`), converted into `zone`
/// - naive local date-times (`2024-03-05T23:30:00`, `2024-03-05 23:30:00`),
///   already expressed in `zone`
/// - bare days (`2024-03-05`)
///
/// # Errors
/// Returns [`CoreError::InvalidDate`] for anything else, including values
/// outside chrono's representable range.
pub fn parse_day_in<Z: TimeZone>(raw: &str, zone: &Z) -> Result<NaiveDate> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(CoreError::invalid_date(raw, "empty timestamp"));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(normalize(&instant, zone));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.date());
        }
    }

    NaiveDate::parse_from_str(input, DAY_FORMAT)
        .map_err(|e| CoreError::invalid_date(raw, e.to_string()))
}

/// Today's day key in the system's local zone.
///
/// This is the only place the library reads the clock; everything downstream
/// takes the result as an explicit argument.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Step `n` days into the past, saturating at the earliest representable day.
pub fn days_back(day: NaiveDate, n: u32) -> NaiveDate {
    day.checked_sub_days(Days::new(u64::from(n)))
        .unwrap_or(NaiveDate::MIN)
}

/// Format a day key the way it is persisted.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayRange {
    /// # Errors
    /// Returns [`ValidationError::InvalidDayRange`] when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ValidationError::InvalidDayRange { start, end }.into());
        }
        Ok(Self { start, end })
    }

    /// `[today - days, today]`, the window shape used by the completion rate.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        Self {
            start: days_back(today, days),
            end: today,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}
