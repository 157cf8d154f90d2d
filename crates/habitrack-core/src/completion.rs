//! Trailing-window completion rate.

use chrono::NaiveDate;

use crate::date::DayRange;
use crate::habit::CheckIn;

/// Window used when none is configured.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Percentage of recorded check-ins in `[today - window_days, today]` that
/// were completed.
///
/// The denominator is `min(window_days, recorded)`: days without any check-in
/// do not count against the habit. Three completed check-ins in a 30-day
/// window therefore score 100, not 10. Rounded half up, clamped to 100, and 0
/// when nothing was recorded in the window.
pub fn completion_rate(check_ins: &[CheckIn], window_days: u32, today: NaiveDate) -> u8 {
    let window = DayRange::trailing(today, window_days);

    let (recorded, completed) = check_ins
        .iter()
        .filter(|c| window.contains(c.date))
        .fold((0u64, 0u64), |(recorded, completed), c| {
            (recorded + 1, completed + u64::from(c.completed))
        });

    let denominator = recorded.min(u64::from(window_days));
    if denominator == 0 {
        return 0;
    }

    let rounded = (completed * 200 + denominator) / (denominator * 2);
    rounded.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::days_back;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn check_in(days_ago: u32, completed: bool) -> CheckIn {
        CheckIn::new("h1", days_back(today(), days_ago), completed)
    }

    #[test]
    fn empty_window_is_zero() {
        assert_eq!(completion_rate(&[], 30, today()), 0);
        // everything is older than the window
        assert_eq!(completion_rate(&[check_in(45, true)], 30, today()), 0);
    }

    #[test]
    fn rate_is_of_days_attempted() {
        let history = [check_in(0, true), check_in(4, true), check_in(9, true)];
        assert_eq!(completion_rate(&history, 30, today()), 100);
    }

    #[test]
    fn eight_of_ten() {
        let history: Vec<CheckIn> = (0..10).map(|d| check_in(d, d < 8)).collect();
        assert_eq!(completion_rate(&history, 30, today()), 80);
    }

    #[test]
    fn rounds_half_up() {
        // 1 of 8 = 12.5%
        let history: Vec<CheckIn> = (0..8).map(|d| check_in(d, d == 0)).collect();
        assert_eq!(completion_rate(&history, 30, today()), 13);
        // 2 of 3 = 66.67%
        let history = [check_in(0, true), check_in(1, true), check_in(2, false)];
        assert_eq!(completion_rate(&history, 30, today()), 67);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let history = [check_in(7, true), check_in(8, false)];
        assert_eq!(completion_rate(&history, 7, today()), 100);
    }

    #[test]
    fn full_window_plus_edge_day_is_capped() {
        // [today - 7, today] spans eight days but the denominator caps at seven
        let history: Vec<CheckIn> = (0..=7).map(|d| check_in(d, true)).collect();
        assert_eq!(completion_rate(&history, 7, today()), 100);
    }

    #[test]
    fn zero_day_window_is_zero() {
        assert_eq!(completion_rate(&[check_in(0, true)], 0, today()), 0);
    }
}
