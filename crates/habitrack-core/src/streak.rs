//! Current-streak computation.
//!
//! A streak is the run of consecutive completed days ending at today, or at
//! yesterday when today has no check-in yet. Any missing or incomplete day
//! ends the run.

use chrono::NaiveDate;

use crate::habit::CheckIn;

/// Length of the current streak as of `today`.
///
/// `check_ins` may be in any order but must hold at most one record per day.
/// Records dated after `today` are ignored.
pub fn calculate_streak(check_ins: &[CheckIn], today: NaiveDate) -> u32 {
    let mut days: Vec<&CheckIn> = check_ins.iter().filter(|c| c.date <= today).collect();
    days.sort_unstable_by(|a, b| b.date.cmp(&a.date));

    let Some(latest) = days.first() else {
        return 0;
    };

    // No entry for today yet: the streak may still be alive from yesterday.
    let mut expected = if latest.date == today {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    for check_in in days {
        match expected {
            Some(day) if check_in.date == day && check_in.completed => {
                streak += 1;
                expected = day.pred_opt();
            }
            _ => break,
        }
    }
    streak
}
