//! SQLite-based storage for habits, check-ins and badges.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;
use std::path::Path;
use uuid::Uuid;

use super::{data_dir, migrations, HabitStore};
use crate::date::{self, DayRange};
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::habit::{Badge, BadgeProposal, CheckIn, Habit, HabitFrequency, HabitUpdate, NewHabit};

// Bounds for an unrestricted check-in query; stored days are `YYYY-MM-DD`.
const FIRST_DAY: &str = "0000-01-01";
const LAST_DAY: &str = "9999-12-31";

const HABIT_COLUMNS: &str =
    "id, name, description, category, color, icon, frequency, goal, created_at, updated_at";

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(dt_str) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!(value = dt_str, error = %e, "unparsable stored timestamp, using current time");
            Utc::now()
        }
    }
}

/// Parse habit frequency from database string
fn parse_frequency(frequency_str: &str) -> HabitFrequency {
    frequency_str.parse().unwrap_or_default()
}

fn row_to_habit(row: &rusqlite::Row) -> Result<Habit, rusqlite::Error> {
    let frequency: String = row.get(6)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        color: row.get(4)?,
        icon: row.get(5)?,
        frequency: parse_frequency(&frequency),
        goal: row.get(7)?,
        created_at: parse_datetime_fallback(&created_at),
        updated_at: parse_datetime_fallback(&updated_at),
    })
}

fn row_to_badge(row: &rusqlite::Row) -> Result<Badge, rusqlite::Error> {
    let earned_at: String = row.get(5)?;
    Ok(Badge {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        icon: row.get(4)?,
        earned_at: parse_datetime_fallback(&earned_at),
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// SQLite database for habit storage.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/habitrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("habitrack.db"))
    }

    /// Open (or create) a database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Habits ===

    /// # Errors
    /// Returns a validation error for bad input, or a database error.
    pub fn create_habit(&self, new: &NewHabit) -> Result<Habit> {
        new.validate()?;

        let now = Utc::now();
        let habit = Habit {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            description: new.description.clone(),
            category: new.category.trim().to_string(),
            color: new.color.clone(),
            icon: new.icon.clone(),
            frequency: new.frequency,
            goal: new.goal,
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO habits (id, name, description, category, color, icon, frequency, goal, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                habit.id,
                habit.name,
                habit.description,
                habit.category,
                habit.color,
                habit.icon,
                habit.frequency.as_str(),
                habit.goal,
                habit.created_at.to_rfc3339(),
                habit.updated_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(habit_id = %habit.id, name = %habit.name, "created habit");
        Ok(habit)
    }

    /// # Errors
    /// [`CoreError::NotFound`] if no habit has this id.
    pub fn get_habit(&self, id: &str) -> Result<Habit> {
        let sql = format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_habit)
            .optional()?
            .ok_or_else(|| CoreError::NotFound {
                entity: "habit",
                id: id.to_string(),
            })
    }

    /// All habits, newest first, optionally only those in `category`.
    pub fn list_habits(&self, category: Option<&str>) -> Result<Vec<Habit>> {
        let habits = match category {
            Some(category) => {
                let sql = format!(
                    "SELECT {HABIT_COLUMNS} FROM habits WHERE category = ?1 ORDER BY created_at DESC"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![category], row_to_habit)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("SELECT {HABIT_COLUMNS} FROM habits ORDER BY created_at DESC");
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map([], row_to_habit)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(habits)
    }

    /// # Errors
    /// [`CoreError::NotFound`] for an unknown id, or a validation error.
    pub fn update_habit(&self, id: &str, update: &HabitUpdate) -> Result<Habit> {
        let mut habit = self.get_habit(id)?;
        update.apply(&mut habit)?;
        habit.updated_at = Utc::now();

        self.conn.execute(
            "UPDATE habits
             SET name = ?2, description = ?3, category = ?4, color = ?5, icon = ?6,
                 frequency = ?7, goal = ?8, updated_at = ?9
             WHERE id = ?1",
            params![
                habit.id,
                habit.name,
                habit.description,
                habit.category,
                habit.color,
                habit.icon,
                habit.frequency.as_str(),
                habit.goal,
                habit.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(habit)
    }

    /// Delete a habit together with its check-ins and badges.
    ///
    /// # Errors
    /// [`CoreError::NotFound`] if no habit has this id.
    pub fn delete_habit(&self, id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(CoreError::NotFound {
                entity: "habit",
                id: id.to_string(),
            });
        }
        tracing::debug!(habit_id = %id, "deleted habit");
        Ok(())
    }

    // === Check-ins ===

    /// Record whether the habit was done on `day`, replacing any earlier
    /// check-in for the same day.
    ///
    /// # Errors
    /// [`CoreError::NotFound`] for an unknown habit, or a database error.
    pub fn upsert_check_in(
        &self,
        habit_id: &str,
        day: NaiveDate,
        completed: bool,
        notes: Option<&str>,
    ) -> Result<CheckIn> {
        self.get_habit(habit_id)?;

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO check_ins (id, habit_id, day, completed, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(habit_id, day) DO UPDATE SET
                completed = excluded.completed,
                notes = excluded.notes,
                updated_at = excluded.updated_at",
            params![
                Uuid::new_v4().to_string(),
                habit_id,
                date::format_day(day),
                completed,
                notes,
                now,
            ],
        )?;
        tracing::debug!(habit_id, %day, completed, "recorded check-in");

        Ok(CheckIn {
            habit_id: habit_id.to_string(),
            date: day,
            completed,
            notes: notes.map(str::to_string),
        })
    }

    /// Check-ins for a habit, newest first.
    ///
    /// # Errors
    /// [`CoreError::InvalidDate`] if a stored day cannot be parsed.
    pub fn list_check_ins(&self, habit_id: &str, range: Option<DayRange>) -> Result<Vec<CheckIn>> {
        let (start, end) = match range {
            Some(r) => (date::format_day(r.start), date::format_day(r.end)),
            None => (FIRST_DAY.to_string(), LAST_DAY.to_string()),
        };

        let mut stmt = self.conn.prepare(
            "SELECT day, completed, notes
             FROM check_ins
             WHERE habit_id = ?1 AND day >= ?2 AND day <= ?3
             ORDER BY day DESC",
        )?;
        let rows = stmt
            .query_map(params![habit_id, start, end], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(day, completed, notes)| -> Result<CheckIn> {
                Ok(CheckIn {
                    habit_id: habit_id.to_string(),
                    date: date::parse_day(&day)?,
                    completed,
                    notes,
                })
            })
            .collect()
    }

    // === Badges ===

    /// Badges a habit holds, most recently earned first.
    pub fn list_badges(&self, habit_id: &str) -> Result<Vec<Badge>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, name, description, icon, earned_at
             FROM badges
             WHERE habit_id = ?1
             ORDER BY earned_at DESC",
        )?;
        let rows = stmt.query_map(params![habit_id], row_to_badge)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Insert a badge earned at `earned_at`.
    ///
    /// # Errors
    /// [`ValidationError::DuplicateBadge`] if the habit already holds a badge
    /// with this name.
    pub fn insert_badge(
        &self,
        habit_id: &str,
        proposal: &BadgeProposal,
        earned_at: DateTime<Utc>,
    ) -> Result<Badge> {
        let badge = Badge {
            id: Uuid::new_v4().to_string(),
            habit_id: habit_id.to_string(),
            name: proposal.name.clone(),
            description: proposal.description.clone(),
            icon: proposal.icon.clone(),
            earned_at,
        };

        let inserted = self.conn.execute(
            "INSERT INTO badges (id, habit_id, name, description, icon, earned_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                badge.id,
                badge.habit_id,
                badge.name,
                badge.description,
                badge.icon,
                badge.earned_at.to_rfc3339(),
            ],
        );

        match inserted {
            Ok(_) => Ok(badge),
            Err(e) if is_unique_violation(&e) => {
                if self.has_badge(habit_id, &proposal.name)? {
                    Err(ValidationError::DuplicateBadge {
                        habit_id: habit_id.to_string(),
                        name: proposal.name.clone(),
                    }
                    .into())
                } else {
                    Err(e.into())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn has_badge(&self, habit_id: &str, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM badges WHERE habit_id = ?1 AND name = ?2",
            params![habit_id, name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl HabitStore for HabitDb {
    fn load_check_ins(&self, habit_id: &str, range: Option<DayRange>) -> Result<Vec<CheckIn>> {
        self.list_check_ins(habit_id, range)
    }

    fn load_existing_badge_names(&self, habit_id: &str) -> Result<BTreeSet<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM badges WHERE habit_id = ?1")?;
        let rows = stmt.query_map(params![habit_id], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<BTreeSet<_>, _>>()?)
    }

    fn save_badge(&self, habit_id: &str, proposal: &BadgeProposal) -> Result<Badge> {
        self.insert_badge(habit_id, proposal, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::BadgeKind;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, date::DAY_FORMAT).unwrap()
    }

    fn db_with_habit() -> (HabitDb, Habit) {
        let db = HabitDb::open_memory().unwrap();
        let habit = db.create_habit(&NewHabit::new("Read", "learning")).unwrap();
        (db, habit)
    }

    #[test]
    fn create_and_get_habit() {
        let (db, habit) = db_with_habit();
        let loaded = db.get_habit(&habit.id).unwrap();
        assert_eq!(loaded.name, "Read");
        assert_eq!(loaded.icon, "book");
        assert_eq!(loaded.frequency, HabitFrequency::Daily);
        assert_eq!(loaded.goal, 1);
    }

    #[test]
    fn create_rejects_blank_name() {
        let db = HabitDb::open_memory().unwrap();
        let err = db.create_habit(&NewHabit::new(" ", "learning")).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn list_filters_by_category() {
        let db = HabitDb::open_memory().unwrap();
        db.create_habit(&NewHabit::new("Read", "learning")).unwrap();
        db.create_habit(&NewHabit::new("Run", "fitness")).unwrap();
        assert_eq!(db.list_habits(None).unwrap().len(), 2);
        let fitness = db.list_habits(Some("fitness")).unwrap();
        assert_eq!(fitness.len(), 1);
        assert_eq!(fitness[0].name, "Run");
    }

    #[test]
    fn update_habit_persists() {
        let (db, habit) = db_with_habit();
        let update = HabitUpdate {
            name: Some("Read more".into()),
            goal: Some(2),
            ..Default::default()
        };
        db.update_habit(&habit.id, &update).unwrap();
        let loaded = db.get_habit(&habit.id).unwrap();
        assert_eq!(loaded.name, "Read more");
        assert_eq!(loaded.goal, 2);
    }

    #[test]
    fn unknown_habit_is_not_found() {
        let db = HabitDb::open_memory().unwrap();
        assert!(matches!(
            db.get_habit("nope"),
            Err(CoreError::NotFound { .. })
        ));
        assert!(matches!(
            db.delete_habit("nope"),
            Err(CoreError::NotFound { .. })
        ));
        assert!(db
            .upsert_check_in("nope", day("2024-03-01"), true, None)
            .is_err());
    }

    #[test]
    fn check_in_upsert_replaces_same_day() {
        let (db, habit) = db_with_habit();
        db.upsert_check_in(&habit.id, day("2024-03-01"), true, Some("chapter 1"))
            .unwrap();
        db.upsert_check_in(&habit.id, day("2024-03-01"), false, None)
            .unwrap();

        let check_ins = db.list_check_ins(&habit.id, None).unwrap();
        assert_eq!(check_ins.len(), 1);
        assert!(!check_ins[0].completed);
        assert_eq!(check_ins[0].notes, None);
    }

    #[test]
    fn check_ins_are_newest_first_and_range_filtered() {
        let (db, habit) = db_with_habit();
        for d in ["2024-03-01", "2024-03-03", "2024-03-02", "2024-03-10"] {
            db.upsert_check_in(&habit.id, day(d), true, None).unwrap();
        }

        let all = db.list_check_ins(&habit.id, None).unwrap();
        let days: Vec<NaiveDate> = all.iter().map(|c| c.date).collect();
        assert_eq!(
            days,
            [day("2024-03-10"), day("2024-03-03"), day("2024-03-02"), day("2024-03-01")]
        );

        let range = DayRange::new(day("2024-03-02"), day("2024-03-03")).unwrap();
        assert_eq!(db.list_check_ins(&habit.id, Some(range)).unwrap().len(), 2);
    }

    #[test]
    fn corrupt_stored_day_is_invalid_date() {
        let (db, habit) = db_with_habit();
        db.conn()
            .execute(
                "INSERT INTO check_ins (id, habit_id, day, completed, created_at, updated_at)
                 VALUES ('bad', ?1, '2024-02-31', 1, '', '')",
                params![habit.id],
            )
            .unwrap();
        let err = db.list_check_ins(&habit.id, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate { .. }));
    }

    #[test]
    fn badge_names_are_unique_per_habit() {
        let (db, habit) = db_with_habit();
        let other = db.create_habit(&NewHabit::new("Run", "fitness")).unwrap();
        let proposal = BadgeKind::GettingStarted.proposal();

        db.save_badge(&habit.id, &proposal).unwrap();
        db.save_badge(&other.id, &proposal).unwrap();
        let err = db.save_badge(&habit.id, &proposal).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DuplicateBadge { .. })
        ));

        let names = db.load_existing_badge_names(&habit.id).unwrap();
        assert_eq!(names, BTreeSet::from(["Getting Started".to_string()]));
    }

    #[test]
    fn delete_cascades() {
        let (db, habit) = db_with_habit();
        db.upsert_check_in(&habit.id, day("2024-03-01"), true, None)
            .unwrap();
        db.save_badge(&habit.id, &BadgeKind::GettingStarted.proposal())
            .unwrap();

        db.delete_habit(&habit.id).unwrap();

        let orphans: i64 = db
            .conn()
            .query_row(
                "SELECT (SELECT COUNT(*) FROM check_ins) + (SELECT COUNT(*) FROM badges)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn corrupt_stored_timestamp_falls_back_to_now() {
        let (db, habit) = db_with_habit();
        db.conn
            .execute(
                "UPDATE habits SET created_at = 'garbage' WHERE id = ?1",
                params![habit.id],
            )
            .unwrap();

        let before = Utc::now();
        let loaded = db.get_habit(&habit.id).unwrap();
        assert!(loaded.created_at >= before);
        assert_eq!(loaded.updated_at, habit.updated_at);
    }
}
