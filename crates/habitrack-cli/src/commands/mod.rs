pub mod badge;
pub mod checkin;
pub mod config;
pub mod habit;
pub mod stats;

use chrono::NaiveDate;
use habitrack_core::date;
use serde::Serialize;

/// A day given on the command line, or today in the local zone.
pub fn day_or_today(raw: Option<&str>) -> Result<NaiveDate, habitrack_core::CoreError> {
    match raw {
        Some(raw) => date::parse_day(raw),
        None => Ok(date::local_today()),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
