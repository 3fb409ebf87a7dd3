use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand};

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

pub fn styled_command() -> clap::Command {
    Cli::command()
}

#[derive(Debug, Parser)]
#[command(name = "hab")]
#[command(bin_name = "hab")]
#[command(version)]
#[command(about = "A local-first habit tracker with streaks")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        env = "HABITS_DB_PATH",
        help = "Path to the SQLite habit database (defaults to config, then ~/.habits/habits.sqlite)."
    )]
    pub db: Option<String>,

    #[arg(
        short = 'u',
        long,
        env = "HABITS_USER",
        help = "User id habits are scoped to (defaults to config, then 'local')."
    )]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Create a new habit.")]
    New(NewArgs),
    #[command(about = "List habits with filtering.")]
    Ls(ListArgs),
    #[command(about = "Show one habit by id.")]
    Show(ShowArgs),
    #[command(about = "Update habit fields.")]
    Update(UpdateArgs),
    #[command(about = "Mark or un-mark a habit completion for a day.")]
    Toggle(ToggleArgs),
    #[command(about = "Delete a habit.")]
    Rm(RemoveArgs),
    #[command(about = "Generate or install shell completions.")]
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
#[command(about = "Create a new habit.")]
pub struct NewArgs {
    #[arg(help = "Habit title.")]
    pub title: String,

    #[arg(short = 'D', long = "desc", help = "Optional description text.")]
    pub desc: Option<String>,

    #[arg(
        short = 'f',
        long,
        default_value = "daily",
        help = "Tracking frequency: daily or weekly."
    )]
    pub frequency: String,

    #[arg(
        short = 'r',
        long = "reminder",
        help = "Opaque reminder time label (e.g. 07:30)."
    )]
    pub reminder: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "List habits.")]
pub struct ListArgs {
    #[arg(short = 'a', long = "all", help = "Include inactive habits.")]
    pub all: bool,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,

    #[arg(short = 'f', long, help = "Filter by frequency.")]
    pub frequency: Option<String>,

    #[arg(short = 'q', long, help = "Text query over id, title, and description.")]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Show one habit.")]
pub struct ShowArgs {
    #[arg(help = "Habit id.")]
    pub id: String,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Update habit fields.")]
pub struct UpdateArgs {
    #[arg(help = "Habit id.")]
    pub id: String,

    #[arg(short = 't', long, help = "Set title.")]
    pub title: Option<String>,

    #[arg(short = 'D', long, help = "Set description (empty string clears it).")]
    pub description: Option<String>,

    #[arg(short = 'f', long, help = "Set frequency: daily or weekly.")]
    pub frequency: Option<String>,

    #[arg(short = 'r', long, help = "Set reminder time (empty string clears it).")]
    pub reminder: Option<String>,

    #[arg(long, help = "Set whether the habit is active: true or false.")]
    pub active: Option<bool>,
}

#[derive(Debug, Args)]
#[command(about = "Toggle a completion day.")]
pub struct ToggleArgs {
    #[arg(help = "Habit id.")]
    pub id: String,

    #[arg(help = "Calendar date (YYYY-MM-DD). Defaults to today.")]
    pub date: Option<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Delete a habit.")]
pub struct RemoveArgs {
    #[arg(help = "Habit id.")]
    pub id: String,
}

#[derive(Debug, Args)]
#[command(about = "Generate or install shell completions.")]
pub struct CompletionsArgs {
    #[arg(help = "Shell name (bash, zsh, fish). Auto-detected if omitted.")]
    pub shell: Option<String>,

    #[arg(
        short = 'i',
        long = "install",
        help = "Write completions to the canonical path for the shell."
    )]
    pub install: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
