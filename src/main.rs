mod app;
mod cli;
mod completions;
mod config;
mod db;
mod domain;
mod listing;
mod store;
mod ui;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization should work")
    );
}

fn run() -> Result<(), app::AppError> {
    use clap::Parser;
    use cli::Commands;

    let cli = cli::Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        return completions::run_completions_command(args.shell.as_deref(), args.install);
    }

    let config = config::Config::load()?;
    let settings = config::resolve_settings(cli.db.as_deref(), cli.user.as_deref(), &config);
    let app = app::App::open(&settings.db_path)?;

    match cli.command {
        Commands::New(args) => {
            let habit = app.create_habit(
                &settings.user,
                &args.title,
                args.desc.as_deref(),
                &args.frequency,
                args.reminder.as_deref(),
            )?;
            println!(
                "created {} [{}] {}",
                habit.id,
                habit.frequency.to_ascii_uppercase(),
                habit.title
            );
        }
        Commands::Ls(args) => {
            let filter = listing::HabitListFilter {
                include_all: args.all,
                frequency: args.frequency.clone(),
                query: args.query.clone(),
            };
            let habits = listing::apply_filters(app.list_habits(&settings.user)?, &filter);
            if args.json {
                print_json(&habits);
            } else {
                ui::print_habit_list(&habits, &filter);
            }
        }
        Commands::Show(args) => match app.show_habit(&args.id)? {
            Some(habit) => {
                if args.json {
                    print_json(&habit);
                } else {
                    ui::print_habit_show(&habit);
                }
            }
            None => return Err(app::AppError::NotFound(args.id)),
        },
        Commands::Update(args) => {
            let patch = app::UpdateHabitPatch {
                title: args.title,
                description: args.description,
                frequency: args.frequency,
                reminder_time: args.reminder,
                is_active: args.active,
            };
            let habit = app.update_habit(&args.id, patch)?;
            println!(
                "updated {} [{}] {}",
                habit.id,
                habit.frequency.to_ascii_uppercase(),
                habit.title
            );
        }
        Commands::Toggle(args) => {
            let (habit, day) = app.toggle_habit(&args.id, args.date.as_deref())?;
            if args.json {
                print_json(&habit);
            } else {
                let action = if habit.completion_history.iter().any(|d| d == &day) {
                    "marked"
                } else {
                    "cleared"
                };
                println!(
                    "{} {} on {} streak={} best={}",
                    action, habit.id, day, habit.streak, habit.best_streak
                );
            }
        }
        Commands::Rm(args) => {
            app.delete_habit(&args.id)?;
            println!("deleted {}", args.id);
        }
        Commands::Completions(_) => {
            unreachable!("completions are handled before app initialization")
        }
    }

    Ok(())
}
