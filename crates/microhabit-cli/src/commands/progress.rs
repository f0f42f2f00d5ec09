//! Daily completion commands.

use chrono::Local;
use microhabit_core::{growth_stage, CollaboratorError, Notification, Notifier};

use super::{open_tracker, resolve_habit_id, CliClock, CliResult};

pub fn done(habit: &str, clock: CliClock) -> CliResult {
    let mut tracker = open_tracker(clock)?;
    let id = resolve_habit_id(&tracker, habit)?;
    let completion = tracker.complete_habit(&id)?;
    let streak = completion.progress.current_streak;

    println!("Completed: {id}");
    println!("Streak: {streak} {}", growth_stage(streak));
    if let Some(milestone) = completion.milestone {
        println!("{} {}!", milestone.emoji(), milestone.title());
    }
    Ok(())
}

pub fn undo(habit: &str, clock: CliClock) -> CliResult {
    let mut tracker = open_tracker(clock)?;
    let id = resolve_habit_id(&tracker, habit)?;
    let progress = tracker.uncomplete_habit(&id)?;
    println!("Undone: {id}");
    println!("Streak: {}", progress.current_streak);
    Ok(())
}

pub fn today(json: bool, clock: CliClock) -> CliResult {
    let tracker = open_tracker(clock)?;
    let today = tracker.today();
    let store = tracker.store();

    if json {
        let rows: Vec<_> = store
            .habits()
            .iter()
            .filter(|h| h.is_active)
            .map(|h| {
                let p = store.progress(&h.id);
                serde_json::json!({
                    "id": h.id,
                    "name": h.name,
                    "completed": p.is_some_and(|p| p.is_completed_on(today)),
                    "streak": p.map_or(0, |p| p.current_streak),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{today}");
    for habit in store.habits().iter().filter(|h| h.is_active) {
        let Some(progress) = store.progress(&habit.id) else {
            continue;
        };
        let mark = if progress.is_completed_on(today) { "x" } else { " " };
        println!(
            "[{mark}] {} {}  ({} day streak)",
            habit.emoji, habit.name, progress.current_streak
        );
    }
    for risk in tracker.analyzer().streaks_at_risk() {
        println!("! {}: {}-day streak ends unless done today", risk.name, risk.streak);
    }
    Ok(())
}

pub fn motivate(name: Option<&str>, clock: CliClock) -> CliResult {
    let tracker = open_tracker(clock)?;
    println!("{}", tracker.motivational_message(name));
    Ok(())
}

/// Prints notifications to stdout.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), CollaboratorError> {
        println!("{}", notification.title);
        println!("  {}", notification.body);
        Ok(())
    }
}

/// Send whichever reminders are enabled in config.
pub fn remind(force: bool, clock: CliClock) -> CliResult {
    let tracker = open_tracker(clock)?.with_notifier(Box::new(ConsoleNotifier));

    let mut sent = 0;
    if force || tracker.daily_reminder_due(Local::now().time()) {
        sent += usize::from(tracker.send_daily_reminder());
    }
    sent += tracker.send_streak_reminders();
    sent += usize::from(tracker.send_daily_summary());
    sent += usize::from(tracker.send_motivational_notification(None));
    println!("sent {sent} notification(s)");
    Ok(())
}

pub fn insight(clock: CliClock) -> CliResult {
    let tracker = open_tracker(clock)?;
    let text = tracker
        .saved_weekly_insight()
        .unwrap_or_else(|| tracker.weekly_insight());
    println!("{text}");
    Ok(())
}

pub fn suggest(clock: CliClock) -> CliResult {
    let tracker = open_tracker(clock)?;
    for suggestion in tracker.habit_suggestions() {
        println!("{suggestion}");
    }
    Ok(())
}
