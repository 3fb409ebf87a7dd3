use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::ConfigError;
use crate::domain::frequency::{Frequency, ParseFrequencyError};
use crate::domain::streak::{format_day, today_utc};
use crate::store::{
    HabitPatch, HabitRecord, HabitStore, MemoryHabitStore, NewHabit, SqliteHabitStore, StoreError,
};

pub struct App {
    store: Box<dyn HabitStore>,
}

/// Caller-facing habit shape. Field names follow the wire contract the
/// storage layer persists, so `--json` output is stable.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitView {
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

#[derive(Debug, Clone, Default)]
pub struct UpdateHabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub reminder_time: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateHabitPatch {
    fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.frequency.is_some()
            || self.reminder_time.is_some()
            || self.is_active.is_some()
    }
}

impl App {
    pub fn open(db_path: &str) -> Result<Self, AppError> {
        ensure_parent_dir(db_path)?;
        let store = SqliteHabitStore::open(db_path)?;
        Ok(Self {
            store: Box::new(store),
        })
    }

    /// Map-backed app with no on-disk state; exercised by the unit tests.
    #[allow(dead_code)]
    pub fn in_memory() -> Self {
        Self {
            store: Box::new(MemoryHabitStore::new()),
        }
    }

    pub fn create_habit(
        &self,
        user_id: &str,
        title: &str,
        description: Option<&str>,
        frequency: &str,
        reminder_time: Option<&str>,
    ) -> Result<HabitView, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidArgument(
                "title cannot be empty".to_string(),
            ));
        }
        let frequency = Frequency::from_str(frequency)?;

        let fields = NewHabit {
            title: title.to_string(),
            description: description.and_then(non_empty),
            frequency,
            reminder_time: reminder_time.and_then(non_empty),
        };
        let habit = self.store.create(user_id, &fields)?;
        Ok(HabitView::from(habit))
    }

    pub fn list_habits(&self, user_id: &str) -> Result<Vec<HabitView>, AppError> {
        Ok(self
            .store
            .list_by_user(user_id)?
            .into_iter()
            .map(HabitView::from)
            .collect())
    }

    pub fn show_habit(&self, id: &str) -> Result<Option<HabitView>, AppError> {
        Ok(self.store.get(id)?.map(HabitView::from))
    }

    pub fn update_habit(&self, id: &str, patch: UpdateHabitPatch) -> Result<HabitView, AppError> {
        if !patch.has_changes() {
            return Err(AppError::InvalidArgument(
                "update requires at least one field change".to_string(),
            ));
        }

        let mut store_patch = HabitPatch::default();
        if let Some(raw) = patch.title.as_deref() {
            let title = raw.trim();
            if title.is_empty() {
                return Err(AppError::InvalidArgument(
                    "title cannot be empty".to_string(),
                ));
            }
            store_patch.title = Some(title.to_string());
        }
        if let Some(raw) = patch.description.as_deref() {
            // An explicit empty string clears the description.
            store_patch.description = Some(non_empty(raw));
        }
        if let Some(raw) = patch.frequency.as_deref() {
            store_patch.frequency = Some(Frequency::from_str(raw)?);
        }
        if let Some(raw) = patch.reminder_time.as_deref() {
            store_patch.reminder_time = Some(non_empty(raw));
        }
        store_patch.is_active = patch.is_active;

        let updated = self
            .store
            .update(id, &store_patch)?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        Ok(HabitView::from(updated))
    }

    pub fn delete_habit(&self, id: &str) -> Result<(), AppError> {
        if self.store.delete(id)? {
            Ok(())
        } else {
            Err(AppError::NotFound(id.to_string()))
        }
    }

    /// Toggles one completion day, defaulting to today. The date format is
    /// checked here at the boundary; the streak engine itself accepts any
    /// string and simply never matches malformed entries. Returns the view
    /// together with the day that was toggled, so callers report the same
    /// day the store saw even if the clock rolls over mid-call.
    pub fn toggle_habit(
        &self,
        id: &str,
        day: Option<&str>,
    ) -> Result<(HabitView, String), AppError> {
        let today = today_utc();
        let day = match day {
            Some(raw) => {
                let trimmed = raw.trim();
                if crate::domain::streak::parse_day(trimmed).is_none() {
                    return Err(AppError::InvalidArgument(format!(
                        "invalid date '{trimmed}': expected YYYY-MM-DD"
                    )));
                }
                trimmed.to_string()
            }
            None => format_day(today),
        };

        let updated = self
            .store
            .toggle_completion(id, &day, today)?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        Ok((HabitView::from(updated), day))
    }
}

fn ensure_parent_dir(path: &str) -> Result<(), AppError> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl From<HabitRecord> for HabitView {
    fn from(value: HabitRecord) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            title: value.title,
            description: value.description,
            frequency: value.frequency,
            reminder_time: value.reminder_time,
            streak: value.streak,
            best_streak: value.best_streak,
            start_date: value.start_date,
            is_active: value.is_active,
            completion_history: value.completion_history,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Store(StoreError),
    Config(ConfigError),
    ParseFrequency(ParseFrequencyError),
    InvalidArgument(String),
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Store(err) => write!(f, "{}", err),
            AppError::Config(err) => write!(f, "config error: {}", err),
            AppError::ParseFrequency(err) => write!(f, "{}", err),
            AppError::InvalidArgument(message) => write!(f, "{}", message),
            AppError::NotFound(id) => write!(f, "habit '{}' not found", id),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::ParseFrequency(err) => Some(err),
            AppError::InvalidArgument(_) => None,
            AppError::NotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Store(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<ParseFrequencyError> for AppError {
    fn from(value: ParseFrequencyError) -> Self {
        AppError::ParseFrequency(value)
    }
}

#[cfg(test)]
mod tests;
