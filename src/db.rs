use std::time::Duration;

use rusqlite::types::Type;
use rusqlite::{params, Connection, DatabaseName, OptionalExtension, Result};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::store::HabitRecord;

pub const CURRENT_SCHEMA_VERSION: i64 = 1;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: [Migration; 1] = [Migration {
    version: 1,
    name: "baseline_habit_schema_v1",
    sql: r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS habit (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    frequency TEXT NOT NULL,
    reminder_time TEXT,
    streak INTEGER NOT NULL DEFAULT 0,
    best_streak INTEGER NOT NULL DEFAULT 0,
    start_date TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    completion_history TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_habit_user_id ON habit(user_id);
CREATE INDEX IF NOT EXISTS idx_habit_user_active ON habit(user_id, is_active);
"#,
}];

pub fn open_connection(path: &str) -> Result<Connection> {
    let mut conn = Connection::open(path)?;
    configure_for_speed(&conn)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

fn configure_for_speed(conn: &Connection) -> Result<()> {
    conn.pragma_update(None::<DatabaseName>, "journal_mode", "WAL")?;
    conn.pragma_update(None::<DatabaseName>, "synchronous", "NORMAL")?;
    conn.pragma_update(None::<DatabaseName>, "foreign_keys", "ON")?;
    conn.pragma_update(None::<DatabaseName>, "temp_store", "MEMORY")?;
    conn.pragma_update(None::<DatabaseName>, "busy_timeout", 5000i64)?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(())
}

fn apply_migrations(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL
);
"#,
    )?;

    for migration in MIGRATIONS {
        let already_applied: Option<i64> = tx
            .query_row(
                "SELECT version FROM schema_migrations WHERE version = ?1",
                params![migration.version],
                |row| row.get(0),
            )
            .optional()?;

        if already_applied.is_some() {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
            params![migration.version, migration.name, now_utc_rfc3339()],
        )?;
    }

    tx.execute(
        r#"
INSERT INTO meta (key, value)
VALUES ('schema_version', ?1)
ON CONFLICT(key) DO UPDATE SET value = excluded.value
"#,
        params![CURRENT_SCHEMA_VERSION.to_string()],
    )?;

    tx.commit()
}

pub fn now_utc_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .expect("RFC3339 formatting for UTC timestamp should never fail")
}

const SELECT_HABIT_COLUMNS: &str = r#"
SELECT id, user_id, title, description, frequency, reminder_time,
       streak, best_streak, start_date, is_active, completion_history, created_at
FROM habit
"#;

pub fn upsert_habit(conn: &Connection, habit: &HabitRecord) -> Result<()> {
    let history = serde_json::to_string(&habit.completion_history)
        .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
    conn.execute(
        r#"
INSERT INTO habit (
    id, user_id, title, description, frequency, reminder_time,
    streak, best_streak, start_date, is_active, completion_history, created_at
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
ON CONFLICT(id) DO UPDATE SET
    user_id = excluded.user_id,
    title = excluded.title,
    description = excluded.description,
    frequency = excluded.frequency,
    reminder_time = excluded.reminder_time,
    streak = excluded.streak,
    best_streak = excluded.best_streak,
    is_active = excluded.is_active,
    completion_history = excluded.completion_history,
    start_date = COALESCE(habit.start_date, excluded.start_date),
    created_at = COALESCE(habit.created_at, excluded.created_at)
"#,
        params![
            habit.id,
            habit.user_id,
            habit.title,
            habit.description,
            habit.frequency,
            habit.reminder_time,
            habit.streak,
            habit.best_streak,
            habit.start_date,
            habit.is_active,
            history,
            habit.created_at
        ],
    )?;
    Ok(())
}

fn habit_from_row(row: &rusqlite::Row<'_>) -> Result<HabitRecord> {
    let raw_history: String = row.get(10)?;
    let completion_history = serde_json::from_str(&raw_history)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(err)))?;
    Ok(HabitRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        frequency: row.get(4)?,
        reminder_time: row.get(5)?,
        streak: row.get(6)?,
        best_streak: row.get(7)?,
        start_date: row.get(8)?,
        is_active: row.get(9)?,
        completion_history,
        created_at: row.get(11)?,
    })
}

pub fn get_habit(conn: &Connection, id: &str) -> Result<Option<HabitRecord>> {
    conn.query_row(
        &format!("{SELECT_HABIT_COLUMNS} WHERE id = ?1"),
        params![id],
        habit_from_row,
    )
    .optional()
}

pub fn list_habits_by_user(conn: &Connection, user_id: &str) -> Result<Vec<HabitRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_HABIT_COLUMNS} WHERE user_id = ?1 ORDER BY created_at ASC, id ASC"
    ))?;

    let mut rows = stmt.query(params![user_id])?;
    let mut result = Vec::new();
    while let Some(row) = rows.next()? {
        result.push(habit_from_row(row)?);
    }
    Ok(result)
}

pub fn delete_habit(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM habit WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}
