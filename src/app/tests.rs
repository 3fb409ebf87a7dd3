use super::{App, AppError, UpdateHabitPatch};
use crate::domain::streak::parse_day;
use std::path::PathBuf;
use uuid::Uuid;

fn unique_workspace() -> PathBuf {
    let root = std::env::temp_dir().join(format!("habits-app-test-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&root).expect("temp workspace should be creatable");
    root
}

#[test]
fn create_habit_defaults_derived_state() {
    let app = App::in_memory();
    let created = app
        .create_habit("user-1", "Morning run", Some("around the block"), "daily", None)
        .expect("create should succeed");

    assert!(created.id.starts_with("H-"));
    assert_eq!(created.user_id, "user-1");
    assert_eq!(created.title, "Morning run");
    assert_eq!(created.description.as_deref(), Some("around the block"));
    assert_eq!(created.frequency, "daily");
    assert_eq!(created.streak, 0);
    assert_eq!(created.best_streak, 0);
    assert!(created.is_active);
    assert!(created.completion_history.is_empty());
}

#[test]
fn create_habit_rejects_blank_title_and_bad_frequency() {
    let app = App::in_memory();
    let blank = app.create_habit("user-1", "   ", None, "daily", None);
    assert!(matches!(blank, Err(AppError::InvalidArgument(_))));

    let bad = app.create_habit("user-1", "Run", None, "hourly", None);
    assert!(matches!(bad, Err(AppError::ParseFrequency(_))));
}

#[test]
fn list_and_show_scope_by_user_and_id() {
    let app = App::in_memory();
    let mine = app
        .create_habit("user-1", "Run", None, "daily", None)
        .expect("create should succeed");
    app.create_habit("user-2", "Swim", None, "weekly", None)
        .expect("create should succeed");

    let listed = app.list_habits("user-1").expect("list should succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);

    let shown = app
        .show_habit(&mine.id)
        .expect("show should succeed")
        .expect("habit should exist");
    assert_eq!(shown.title, "Run");
    assert!(app
        .show_habit("H-missing")
        .expect("show should succeed")
        .is_none());
}

#[test]
fn update_merges_fields_without_touching_streaks() {
    let app = App::in_memory();
    let created = app
        .create_habit("user-1", "Run", Some("5k"), "daily", Some("06:00"))
        .expect("create should succeed");

    let updated = app
        .update_habit(
            &created.id,
            UpdateHabitPatch {
                title: Some("Evening run".to_string()),
                description: Some(String::new()),
                frequency: Some("weekly".to_string()),
                reminder_time: None,
                is_active: Some(false),
            },
        )
        .expect("update should succeed");

    assert_eq!(updated.title, "Evening run");
    assert_eq!(updated.description, None, "empty string clears the field");
    assert_eq!(updated.frequency, "weekly");
    assert_eq!(updated.reminder_time.as_deref(), Some("06:00"));
    assert!(!updated.is_active);
    assert_eq!(updated.streak, 0);
    assert_eq!(updated.best_streak, 0);
}

#[test]
fn update_requires_changes_and_an_existing_habit() {
    let app = App::in_memory();
    let empty = app.update_habit("H-any", UpdateHabitPatch::default());
    assert!(matches!(empty, Err(AppError::InvalidArgument(_))));

    let missing = app.update_habit(
        "H-missing",
        UpdateHabitPatch {
            title: Some("x".to_string()),
            ..UpdateHabitPatch::default()
        },
    );
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[test]
fn delete_habit_signals_missing_records() {
    let app = App::in_memory();
    let created = app
        .create_habit("user-1", "Run", None, "daily", None)
        .expect("create should succeed");

    app.delete_habit(&created.id).expect("delete should succeed");
    let again = app.delete_habit(&created.id);
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[test]
fn toggle_defaults_to_today_and_double_toggle_restores_history() {
    let app = App::in_memory();
    let created = app
        .create_habit("user-1", "Run", None, "daily", None)
        .expect("create should succeed");

    let (marked, marked_day) = app
        .toggle_habit(&created.id, None)
        .expect("toggle should succeed");
    assert_eq!(marked.completion_history, vec![marked_day.clone()]);
    assert_eq!(marked.streak, 1);
    assert_eq!(marked.best_streak, 1);
    assert!(
        parse_day(&marked_day).is_some(),
        "defaulted day must be a valid calendar date"
    );
    assert!(
        marked.completion_history.contains(&marked_day),
        "reported day must be the day that was written"
    );

    let (unmarked, _) = app
        .toggle_habit(&created.id, Some(&marked_day))
        .expect("toggle should succeed");
    assert!(unmarked.completion_history.is_empty());
    assert_eq!(unmarked.streak, 0);
    assert_eq!(unmarked.best_streak, 1, "best streak is monotonic");
}

#[test]
fn toggle_rejects_malformed_dates_at_the_boundary() {
    let app = App::in_memory();
    let created = app
        .create_habit("user-1", "Run", None, "daily", None)
        .expect("create should succeed");

    let bad = app.toggle_habit(&created.id, Some("10/01/2024"));
    assert!(matches!(bad, Err(AppError::InvalidArgument(_))));

    let missing = app.toggle_habit("H-missing", None);
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[test]
fn open_creates_db_parent_directories() {
    let root = unique_workspace();
    let db_path = root.join("nested/dir/habits.sqlite");
    let app = App::open(db_path.to_str().expect("utf8 path")).expect("app should open");

    let created = app
        .create_habit("user-1", "Run", None, "daily", None)
        .expect("create should succeed");
    let listed = app.list_habits("user-1").expect("list should succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);

    let _ = std::fs::remove_dir_all(root);
}
