//! Integration tests for the check-in to badge workflow.
//!
//! Records check-ins through the SQLite store and checks the derived streak,
//! completion rate and awarded badges end to end.

use chrono::NaiveDate;
use habitrack_core::date::days_back;
use habitrack_core::{
    award_badges, calculate_streak, completion_rate, evaluate_badges, HabitDb, HabitStore,
    NewHabit, DEFAULT_WINDOW_DAYS,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn setup() -> (HabitDb, String) {
    let db = HabitDb::open_memory().unwrap();
    let habit = db.create_habit(&NewHabit::new("Meditate", "mindfulness")).unwrap();
    (db, habit.id)
}

#[test]
fn test_seven_day_week() {
    let (db, id) = setup();
    for ago in 0..7 {
        db.upsert_check_in(&id, days_back(today(), ago), true, None)
            .unwrap();
    }

    let check_ins = db.load_check_ins(&id, None).unwrap();
    assert_eq!(calculate_streak(&check_ins, today()), 7);
    assert_eq!(completion_rate(&check_ins, DEFAULT_WINDOW_DAYS, today()), 100);

    let awarded = award_badges(&db, &id, today()).unwrap();
    let names: Vec<&str> = awarded.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["7-Day Streak", "Perfect Week", "Getting Started"]);

    let stored = db.list_badges(&id).unwrap();
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().any(|b| b.name == "7-Day Streak" && b.icon == "flame"));
}

#[test]
fn test_eight_of_ten_is_not_dedicated() {
    let (db, id) = setup();
    for ago in 0..10 {
        db.upsert_check_in(&id, days_back(today(), ago), ago != 3 && ago != 6, None)
            .unwrap();
    }

    let check_ins = db.load_check_ins(&id, None).unwrap();
    assert_eq!(completion_rate(&check_ins, DEFAULT_WINDOW_DAYS, today()), 80);
    assert_eq!(calculate_streak(&check_ins, today()), 3);

    let awarded = award_badges(&db, &id, today()).unwrap();
    let names: Vec<&str> = awarded.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Getting Started"]);
}

#[test]
fn test_gap_keeps_only_recent_run() {
    let (db, id) = setup();
    for ago in [0, 1, 5] {
        db.upsert_check_in(&id, days_back(today(), ago), true, None)
            .unwrap();
    }
    let check_ins = db.load_check_ins(&id, None).unwrap();
    assert_eq!(calculate_streak(&check_ins, today()), 2);
}

#[test]
fn test_rewriting_a_day_breaks_the_streak() {
    let (db, id) = setup();
    for ago in 0..5 {
        db.upsert_check_in(&id, days_back(today(), ago), true, None)
            .unwrap();
    }
    db.upsert_check_in(&id, days_back(today(), 2), false, Some("sick"))
        .unwrap();

    let check_ins = db.load_check_ins(&id, None).unwrap();
    assert_eq!(check_ins.len(), 5);
    assert_eq!(calculate_streak(&check_ins, today()), 2);
}

#[test]
fn test_awarding_is_idempotent_across_runs() {
    let (db, id) = setup();
    for ago in 0..30 {
        db.upsert_check_in(&id, days_back(today(), ago), true, None)
            .unwrap();
    }

    assert_eq!(award_badges(&db, &id, today()).unwrap().len(), 5);
    assert!(award_badges(&db, &id, today()).unwrap().is_empty());

    let check_ins = db.load_check_ins(&id, None).unwrap();
    let existing = db.load_existing_badge_names(&id).unwrap();
    assert!(evaluate_badges(&check_ins, &existing, today()).is_empty());
}

#[test]
fn test_badges_survive_a_broken_streak() {
    let (db, id) = setup();
    for ago in 3..10 {
        db.upsert_check_in(&id, days_back(today(), ago), true, None)
            .unwrap();
    }
    // evaluated a week ago the streak was 7
    assert_eq!(
        award_badges(&db, &id, days_back(today(), 3)).unwrap().len(),
        3
    );

    // today the streak is gone but nothing is revoked
    assert!(award_badges(&db, &id, today()).unwrap().is_empty());
    assert_eq!(db.list_badges(&id).unwrap().len(), 3);
}
