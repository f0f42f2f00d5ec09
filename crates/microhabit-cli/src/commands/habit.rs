//! Habit management commands for CLI.

use clap::Subcommand;
use microhabit_core::{growth_stage, Difficulty, NewHabit};

use super::{open_tracker, resolve_habit_id, CliClock, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Habit description
        #[arg(long)]
        description: Option<String>,
        /// Emoji shown next to the habit
        #[arg(long)]
        emoji: Option<String>,
        /// Category (default: Other)
        #[arg(long)]
        category: Option<String>,
        /// Difficulty: easy, medium or hard (default: medium)
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        /// Reminder time, HH:MM
        #[arg(long)]
        reminder: Option<String>,
        /// Target number of days
        #[arg(long)]
        target_days: Option<u32>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List habits
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a habit with its progress
    Show {
        /// Habit id or name
        habit: String,
    },
    /// Edit a habit
    Edit {
        /// Habit id or name
        habit: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New emoji
        #[arg(long)]
        emoji: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New difficulty
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// New reminder time, HH:MM
        #[arg(long)]
        reminder: Option<String>,
        /// Pause or resume the habit
        #[arg(long)]
        active: Option<bool>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a habit and its history
    Delete {
        /// Habit id or name
        habit: String,
    },
}

pub fn run(action: HabitAction, clock: CliClock) -> CliResult {
    let mut tracker = open_tracker(clock)?;

    match action {
        HabitAction::Add {
            name,
            description,
            emoji,
            category,
            difficulty,
            reminder,
            target_days,
            notes,
        } => {
            let habit = tracker.add_habit(NewHabit {
                name,
                description,
                emoji,
                category,
                difficulty,
                reminder_time: reminder,
                target_days,
                notes,
            })?;
            println!("Habit created: {} {} ({})", habit.emoji, habit.name, habit.id);
        }
        HabitAction::List { json } => {
            let store = tracker.store();
            if json {
                println!("{}", serde_json::to_string_pretty(store.habits())?);
            } else if store.is_empty() {
                println!("No habits yet. Add one with `microhabit habit add <name>`.");
            } else {
                for habit in store.habits() {
                    let streak = store.progress(&habit.id).map_or(0, |p| p.current_streak);
                    let paused = if habit.is_active { "" } else { " [paused]" };
                    println!(
                        "{} {} {}  streak {}  {}{}",
                        growth_stage(streak),
                        habit.emoji,
                        habit.name,
                        streak,
                        habit.id,
                        paused
                    );
                }
            }
        }
        HabitAction::Show { habit } => {
            let id = resolve_habit_id(&tracker, &habit)?;
            let store = tracker.store();
            let output = serde_json::json!({
                "habit": store.habit(&id),
                "progress": store.progress(&id),
                "stats": store.habit(&id).map(|h| tracker.analyzer().habit_stats(h)),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        HabitAction::Edit {
            habit,
            name,
            description,
            emoji,
            category,
            difficulty,
            reminder,
            active,
            notes,
        } => {
            let id = resolve_habit_id(&tracker, &habit)?;
            let mut edited = tracker
                .store()
                .habit(&id)
                .cloned()
                .ok_or_else(|| format!("no habit with id '{id}'"))?;
            if let Some(name) = name {
                edited.name = name;
            }
            if description.is_some() {
                edited.description = description;
            }
            if let Some(emoji) = emoji {
                edited.emoji = emoji;
            }
            if let Some(category) = category {
                edited.category = category;
            }
            if let Some(difficulty) = difficulty {
                edited.difficulty = difficulty;
            }
            if reminder.is_some() {
                edited.reminder_time = reminder;
            }
            if let Some(active) = active {
                edited.is_active = active;
            }
            if notes.is_some() {
                edited.notes = notes;
            }
            tracker.update_habit(edited)?;
            println!("Habit updated: {id}");
        }
        HabitAction::Delete { habit } => {
            let id = resolve_habit_id(&tracker, &habit)?;
            let removed = tracker.delete_habit(&id)?;
            println!("Habit deleted: {}", removed.name);
        }
    }
    Ok(())
}
