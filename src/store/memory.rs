use std::collections::HashMap;
use std::sync::Mutex;

use time::Date;

use super::{HabitPatch, HabitRecord, HabitStore, NewHabit, StoreError};

/// Map-backed store for tests and embedders that do not want a database
/// file. The mutex serializes whole operations, so a toggle's
/// read-modify-write is atomic within one process.
#[derive(Default)]
pub struct MemoryHabitStore {
    habits: Mutex<HashMap<String, HabitRecord>>,
}

impl MemoryHabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_habits<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, HabitRecord>) -> T,
    ) -> Result<T, StoreError> {
        let mut habits = self.habits.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut habits))
    }
}

impl HabitStore for MemoryHabitStore {
    fn get(&self, id: &str) -> Result<Option<HabitRecord>, StoreError> {
        self.with_habits(|habits| habits.get(id).cloned())
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<HabitRecord>, StoreError> {
        self.with_habits(|habits| {
            let mut result: Vec<HabitRecord> = habits
                .values()
                .filter(|habit| habit.user_id == user_id)
                .cloned()
                .collect();
            result.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            result
        })
    }

    fn create(&self, user_id: &str, fields: &NewHabit) -> Result<HabitRecord, StoreError> {
        let habit = HabitRecord::create(user_id, fields);
        self.with_habits(|habits| {
            habits.insert(habit.id.clone(), habit.clone());
            habit
        })
    }

    fn update(&self, id: &str, patch: &HabitPatch) -> Result<Option<HabitRecord>, StoreError> {
        self.with_habits(|habits| {
            let habit = habits.get_mut(id)?;
            patch.apply_to(habit);
            Some(habit.clone())
        })
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.with_habits(|habits| habits.remove(id).is_some())
    }

    fn toggle_completion(
        &self,
        id: &str,
        day: &str,
        today: Date,
    ) -> Result<Option<HabitRecord>, StoreError> {
        self.with_habits(|habits| {
            let habit = habits.get_mut(id)?;
            habit.apply_toggle(day, today);
            Some(habit.clone())
        })
    }
}
