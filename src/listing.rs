use crate::app::HabitView;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitListFilter {
    pub include_all: bool,
    pub frequency: Option<String>,
    pub query: Option<String>,
}

/// Applies `ls` filters. Inactive habits are hidden unless `--all` is set;
/// frequency and query filters match case-insensitively.
pub fn apply_filters(habits: Vec<HabitView>, filter: &HabitListFilter) -> Vec<HabitView> {
    let normalized = NormalizedFilter::from(filter);
    habits
        .into_iter()
        .filter(|habit| matches_filter(habit, &normalized))
        .collect()
}

#[derive(Debug, Clone, Default)]
struct NormalizedFilter {
    include_all: bool,
    frequency: Option<String>,
    query: Option<String>,
}

impl From<&HabitListFilter> for NormalizedFilter {
    fn from(value: &HabitListFilter) -> Self {
        Self {
            include_all: value.include_all,
            frequency: normalize_scalar(value.frequency.as_deref()),
            query: normalize_scalar(value.query.as_deref()),
        }
    }
}

fn matches_filter(habit: &HabitView, filter: &NormalizedFilter) -> bool {
    if !habit.is_active && !filter.include_all {
        return false;
    }

    if let Some(expected) = filter.frequency.as_deref() {
        if habit.frequency.to_ascii_lowercase() != expected {
            return false;
        }
    }

    if let Some(query) = filter.query.as_deref() {
        return matches_query(habit, query);
    }

    true
}

fn matches_query(habit: &HabitView, query: &str) -> bool {
    let haystacks = [
        Some(habit.id.as_str()),
        Some(habit.title.as_str()),
        habit.description.as_deref(),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|text| text.to_ascii_lowercase().contains(query))
}

fn normalize_scalar(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_lowercase())
    }
}
