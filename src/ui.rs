use std::io::{self, IsTerminal};

use crate::app::HabitView;
use crate::listing::HabitListFilter;

pub fn print_habit_list(habits: &[HabitView], filter: &HabitListFilter) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Habits"));
    if let Some(summary) = filter_summary(filter) {
        println!("{}", palette.dim(&format!("filters: {summary}")));
    }

    if habits.is_empty() {
        println!("{}", palette.dim("no habits matched"));
        return;
    }

    for habit in habits {
        println!("{}", format_habit_row(habit, &palette));
    }
    println!("{}", palette.dim(&format!("{} habit(s)", habits.len())));
}

pub fn print_habit_show(habit: &HabitView) {
    let palette = Palette::auto();
    println!(
        "{} {} {}",
        palette.id(&habit.id),
        palette.frequency(&habit.frequency),
        habit.title
    );
    if let Some(description) = habit.description.as_deref() {
        println!("  {}", description);
    }
    if let Some(reminder) = habit.reminder_time.as_deref() {
        println!("  reminder: {}", reminder);
    }
    println!("  {}", palette.streak(habit.streak, habit.best_streak));
    if !habit.is_active {
        println!("  {}", palette.dim("inactive"));
    }
    println!(
        "  {} completion(s), started {}",
        habit.completion_history.len(),
        habit.start_date
    );
}

fn format_habit_row(habit: &HabitView, palette: &Palette) -> String {
    let mut line = format!(
        "{} {} {} {}",
        palette.id(&habit.id),
        palette.frequency(&habit.frequency),
        habit.title,
        palette.streak(habit.streak, habit.best_streak)
    );
    if !habit.is_active {
        line.push(' ');
        line.push_str(&palette.dim("(inactive)"));
    }
    line
}

fn filter_summary(filter: &HabitListFilter) -> Option<String> {
    let mut parts = Vec::new();
    if filter.include_all {
        parts.push("all=true".to_string());
    }
    if let Some(frequency) = filter.frequency.as_deref().and_then(non_empty) {
        parts.push(format!("frequency={frequency}"));
    }
    if let Some(query) = filter.query.as_deref().and_then(non_empty) {
        parts.push(format!("query={query}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

struct Palette {
    enabled: bool,
}

impl Palette {
    fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn id(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    fn frequency(&self, frequency: &str) -> String {
        let upper = frequency.to_ascii_uppercase();
        self.paint(frequency_color_code(frequency), &format!("[{upper}]"))
    }

    fn streak(&self, streak: i64, best_streak: i64) -> String {
        let code = if streak > 0 { "33" } else { "90" };
        self.paint(code, &format!("streak {streak} (best {best_streak})"))
    }
}

fn frequency_color_code(frequency: &str) -> &'static str {
    match frequency.trim().to_ascii_lowercase().as_str() {
        "daily" => "36",
        "weekly" => "35",
        _ => "37",
    }
}
