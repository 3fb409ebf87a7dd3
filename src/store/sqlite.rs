use rusqlite::Connection;
use time::Date;

use super::{HabitPatch, HabitRecord, HabitStore, NewHabit, StoreError};
use crate::db;

/// Production backend. One connection, one process; concurrent writers are
/// serialized by SQLite's busy timeout. Toggles are read-modify-write with
/// last-write-wins semantics, acceptable for a single-user-per-habit tool.
pub struct SqliteHabitStore {
    conn: Connection,
}

impl SqliteHabitStore {
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let conn = db::open_connection(db_path)?;
        Ok(Self { conn })
    }
}

impl HabitStore for SqliteHabitStore {
    fn get(&self, id: &str) -> Result<Option<HabitRecord>, StoreError> {
        Ok(db::get_habit(&self.conn, id)?)
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<HabitRecord>, StoreError> {
        Ok(db::list_habits_by_user(&self.conn, user_id)?)
    }

    fn create(&self, user_id: &str, fields: &NewHabit) -> Result<HabitRecord, StoreError> {
        let habit = HabitRecord::create(user_id, fields);
        db::upsert_habit(&self.conn, &habit)?;
        Ok(habit)
    }

    fn update(&self, id: &str, patch: &HabitPatch) -> Result<Option<HabitRecord>, StoreError> {
        let Some(mut habit) = db::get_habit(&self.conn, id)? else {
            return Ok(None);
        };
        patch.apply_to(&mut habit);
        db::upsert_habit(&self.conn, &habit)?;
        Ok(Some(habit))
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(db::delete_habit(&self.conn, id)?)
    }

    fn toggle_completion(
        &self,
        id: &str,
        day: &str,
        today: Date,
    ) -> Result<Option<HabitRecord>, StoreError> {
        let Some(mut habit) = db::get_habit(&self.conn, id)? else {
            return Ok(None);
        };
        habit.apply_toggle(day, today);
        db::upsert_habit(&self.conn, &habit)?;
        Ok(Some(habit))
    }
}
