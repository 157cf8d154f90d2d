//! Per-habit progress snapshots and the dashboard roll-up.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::completion::completion_rate;
use crate::habit::{Badge, CheckIn, Habit};
use crate::streak::calculate_streak;

/// Derived numbers for one habit as of a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitProgress {
    pub habit_id: String,
    pub name: String,
    pub category: String,
    pub streak: u32,
    pub completion_rate: u8,
    pub window_days: u32,
    pub completed_today: bool,
    pub check_in_count: usize,
    pub badge_count: usize,
}

impl HabitProgress {
    pub fn compute(
        habit: &Habit,
        check_ins: &[CheckIn],
        badges: &[Badge],
        today: NaiveDate,
        window_days: u32,
    ) -> Self {
        Self {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            category: habit.category.clone(),
            streak: calculate_streak(check_ins, today),
            completion_rate: completion_rate(check_ins, window_days, today),
            window_days,
            completed_today: check_ins.iter().any(|c| c.date == today && c.completed),
            check_in_count: check_ins.len(),
            badge_count: badges.len(),
        }
    }
}

/// Totals across every habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_habits: usize,
    pub total_badges: usize,
    /// Sum of every habit's current streak
    pub total_streak: u64,
    pub completed_today: usize,
}

impl DashboardSummary {
    pub fn from_progress(progress: &[HabitProgress]) -> Self {
        progress.iter().fold(
            Self {
                total_habits: progress.len(),
                ..Self::default()
            },
            |mut summary, p| {
                summary.total_badges += p.badge_count;
                summary.total_streak += u64::from(p.streak);
                summary.completed_today += usize::from(p.completed_today);
                summary
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::days_back;
    use crate::habit::HabitFrequency;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn habit(id: &str) -> Habit {
        Habit {
            id: id.into(),
            name: format!("habit {id}"),
            description: None,
            category: "health".into(),
            color: "blue".into(),
            icon: "heart".into(),
            frequency: HabitFrequency::Daily,
            goal: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn badge(habit_id: &str, name: &str) -> Badge {
        Badge {
            id: format!("{habit_id}-{name}"),
            habit_id: habit_id.into(),
            name: name.into(),
            description: String::new(),
            icon: "star".into(),
            earned_at: Utc::now(),
        }
    }

    #[test]
    fn progress_for_one_habit() {
        let checks = vec![
            CheckIn::new("a", today(), true),
            CheckIn::new("a", days_back(today(), 1), true),
            CheckIn::new("a", days_back(today(), 2), false),
        ];
        let p = HabitProgress::compute(&habit("a"), &checks, &[], today(), 30);
        assert_eq!(p.streak, 2);
        assert_eq!(p.completion_rate, 67);
        assert!(p.completed_today);
        assert_eq!(p.check_in_count, 3);
    }

    #[test]
    fn dashboard_totals() {
        let a = HabitProgress::compute(
            &habit("a"),
            &[CheckIn::new("a", today(), true)],
            &[badge("a", "Getting Started")],
            today(),
            30,
        );
        let b = HabitProgress::compute(
            &habit("b"),
            &[CheckIn::new("b", days_back(today(), 1), true)],
            &[badge("b", "Getting Started"), badge("b", "7-Day Streak")],
            today(),
            30,
        );
        let summary = DashboardSummary::from_progress(&[a, b]);
        assert_eq!(summary.total_habits, 2);
        assert_eq!(summary.total_badges, 3);
        assert_eq!(summary.total_streak, 2);
        assert_eq!(summary.completed_today, 1);
    }

    #[test]
    fn empty_dashboard() {
        assert_eq!(DashboardSummary::from_progress(&[]), DashboardSummary::default());
    }
}
