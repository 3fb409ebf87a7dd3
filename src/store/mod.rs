use std::error::Error;
use std::fmt;

use serde::Serialize;
use time::Date;
use uuid::Uuid;

mod memory;
mod sqlite;

pub use memory::MemoryHabitStore;
pub use sqlite::SqliteHabitStore;

use crate::db::now_utc_rfc3339;
use crate::domain::frequency::Frequency;

/// Abstract habit persistence contract. Backends only move records around;
/// all streak arithmetic lives in `domain::streak` and is reached solely
/// through `toggle_completion`.
pub trait HabitStore {
    fn get(&self, id: &str) -> Result<Option<HabitRecord>, StoreError>;
    fn list_by_user(&self, user_id: &str) -> Result<Vec<HabitRecord>, StoreError>;
    fn create(&self, user_id: &str, fields: &NewHabit) -> Result<HabitRecord, StoreError>;
    fn update(&self, id: &str, patch: &HabitPatch) -> Result<Option<HabitRecord>, StoreError>;
    fn delete(&self, id: &str) -> Result<bool, StoreError>;
    fn toggle_completion(
        &self,
        id: &str,
        day: &str,
        today: Date,
    ) -> Result<Option<HabitRecord>, StoreError>;
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HabitRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub frequency: String,
    pub reminder_time: Option<String>,
    pub streak: i64,
    pub best_streak: i64,
    pub start_date: String,
    pub is_active: bool,
    pub completion_history: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub frequency: Frequency,
    pub reminder_time: Option<String>,
}

/// Partial update for caller-editable fields. Deliberately has no slot for
/// `completion_history`, `streak`, or `best_streak`: those only change
/// through `toggle_completion`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    pub reminder_time: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl HabitPatch {
    fn apply_to(&self, habit: &mut HabitRecord) {
        if let Some(title) = &self.title {
            habit.title = title.clone();
        }
        if let Some(description) = &self.description {
            habit.description = description.clone();
        }
        if let Some(frequency) = self.frequency {
            habit.frequency = frequency.as_str().to_string();
        }
        if let Some(reminder_time) = &self.reminder_time {
            habit.reminder_time = reminder_time.clone();
        }
        if let Some(is_active) = self.is_active {
            habit.is_active = is_active;
        }
    }
}

impl HabitRecord {
    /// Fresh record with zeroed derived state, owned by `user_id`.
    fn create(user_id: &str, fields: &NewHabit) -> Self {
        let now = now_utc_rfc3339();
        Self {
            id: format!("H-{}", Uuid::now_v7()),
            user_id: user_id.to_string(),
            title: fields.title.clone(),
            description: fields.description.clone(),
            frequency: fields.frequency.as_str().to_string(),
            reminder_time: fields.reminder_time.clone(),
            streak: 0,
            best_streak: 0,
            start_date: now.clone(),
            is_active: true,
            completion_history: Vec::new(),
            created_at: now,
        }
    }

    fn apply_toggle(&mut self, day: &str, today: Date) {
        let outcome = crate::domain::streak::toggle_completion(
            &self.completion_history,
            day,
            self.best_streak,
            today,
        );
        self.completion_history = outcome.history;
        self.streak = outcome.streak;
        self.best_streak = outcome.best_streak;
    }
}

#[derive(Debug)]
pub enum StoreError {
    Db(rusqlite::Error),
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(err) => write!(f, "database error: {}", err),
            StoreError::Poisoned => write!(f, "habit store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Db(err) => Some(err),
            StoreError::Poisoned => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        StoreError::Db(value)
    }
}

#[cfg(test)]
mod tests;
