//! Milestone badge evaluation.
//!
//! Each rule is checked independently against one streak and one 30-day
//! completion rate computed up front. Rules never revoke a badge; they only
//! propose names the habit does not hold yet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::completion::{completion_rate, DEFAULT_WINDOW_DAYS};
use crate::habit::{BadgeProposal, CheckIn};
use crate::streak::calculate_streak;

/// Every badge the evaluator knows about, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeKind {
    SevenDayStreak,
    ThirtyDayStreak,
    PerfectWeek,
    GettingStarted,
    Dedicated,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 5] = [
        BadgeKind::SevenDayStreak,
        BadgeKind::ThirtyDayStreak,
        BadgeKind::PerfectWeek,
        BadgeKind::GettingStarted,
        BadgeKind::Dedicated,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BadgeKind::SevenDayStreak => "7-Day Streak",
            BadgeKind::ThirtyDayStreak => "30-Day Streak",
            BadgeKind::PerfectWeek => "Perfect Week",
            BadgeKind::GettingStarted => "Getting Started",
            BadgeKind::Dedicated => "Dedicated",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BadgeKind::SevenDayStreak => "Completed the habit 7 days in a row",
            BadgeKind::ThirtyDayStreak => "Completed the habit 30 days in a row",
            BadgeKind::PerfectWeek => "Completed every recorded day of the habit for a week",
            BadgeKind::GettingStarted => "Recorded a first check-in",
            BadgeKind::Dedicated => "Kept an 80% completion rate over 30 days",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BadgeKind::SevenDayStreak => "flame",
            BadgeKind::ThirtyDayStreak => "zap",
            BadgeKind::PerfectWeek => "star",
            BadgeKind::GettingStarted => "rocket",
            BadgeKind::Dedicated => "heart",
        }
    }

    fn is_earned(&self, progress: &Progress) -> bool {
        match self {
            BadgeKind::SevenDayStreak => progress.streak >= 7,
            BadgeKind::ThirtyDayStreak => progress.streak >= 30,
            BadgeKind::PerfectWeek => progress.rate == 100 && progress.total >= 7,
            BadgeKind::GettingStarted => progress.total >= 1,
            BadgeKind::Dedicated => progress.rate >= 80 && progress.total >= 30,
        }
    }

    pub fn proposal(&self) -> BadgeProposal {
        BadgeProposal {
            name: self.name().to_string(),
            description: self.description().to_string(),
            icon: self.icon().to_string(),
        }
    }
}

struct Progress {
    streak: u32,
    rate: u8,
    total: usize,
}

/// Badges `check_ins` qualify for that are not already in `existing`.
///
/// "Total" in the rules is every record passed in, completed or not.
/// Proposals come back in [`BadgeKind::ALL`] order. Feeding the returned names
/// back into `existing` and evaluating again yields nothing.
pub fn evaluate_badges(
    check_ins: &[CheckIn],
    existing: &BTreeSet<String>,
    today: NaiveDate,
) -> Vec<BadgeProposal> {
    let progress = Progress {
        streak: calculate_streak(check_ins, today),
        rate: completion_rate(check_ins, DEFAULT_WINDOW_DAYS, today),
        total: check_ins.len(),
    };

    BadgeKind::ALL
        .iter()
        .filter(|kind| !existing.contains(kind.name()))
        .filter(|kind| kind.is_earned(&progress))
        .map(BadgeKind::proposal)
        .collect()
}
