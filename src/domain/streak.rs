use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

/// Calendar-date wire format. Storage backends must preserve this exactly:
/// the streak walk compares dates as strings.
const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn format_day(date: Date) -> String {
    date.format(DAY_FORMAT)
        .expect("calendar date formatting should never fail")
}

pub fn parse_day(raw: &str) -> Option<Date> {
    Date::parse(raw, DAY_FORMAT).ok()
}

/// Result of toggling one completion day. `history` is the full replacement
/// completion history; `streak` and `best_streak` are recomputed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub history: Vec<String>,
    pub streak: i64,
    pub best_streak: i64,
}

/// Adds `day` to the history if absent, removes it if present, then
/// recomputes the streak pair. The reference date is `today`, never the
/// toggled day, so toggling a past day can move the streak to zero even
/// though the history changed elsewhere. Malformed `day` values are not
/// rejected; they simply never match the streak walk.
pub fn toggle_completion(
    history: &[String],
    day: &str,
    best_streak: i64,
    today: Date,
) -> ToggleOutcome {
    let mut history = history.to_vec();
    match history.iter().position(|existing| existing == day) {
        Some(index) => {
            history.remove(index);
        }
        None => history.push(day.to_string()),
    }

    let streak = current_streak(&history, today);
    ToggleOutcome {
        streak,
        best_streak: best_streak.max(streak),
        history,
    }
}

/// Number of consecutive days present in `history`, walking backward from
/// `today` inclusive and stopping at the first gap. Insertion order of the
/// history is irrelevant; it is sorted descending before the walk.
pub fn current_streak(history: &[String], today: Date) -> i64 {
    let mut sorted = history.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut streak = 0i64;
    for (offset, day) in sorted.iter().enumerate() {
        let expected = match today.checked_sub(Duration::days(offset as i64)) {
            Some(date) => date,
            None => break,
        };
        if day == &format_day(expected) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
