use chrono::Datelike;
use clap::Subcommand;

use super::{open_tracker, CliClock, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Completions for the last seven days
    Week,
    /// Per-habit completion rates and streaks
    Habits,
    /// Overall summary
    All,
}

pub fn run(action: StatsAction, clock: CliClock) -> CliResult {
    let tracker = open_tracker(clock)?;
    let analyzer = tracker.analyzer();

    match action {
        StatsAction::Week => {
            println!("{}", serde_json::to_string_pretty(&analyzer.weekly_progress())?);
        }
        StatsAction::Habits => {
            println!("{}", serde_json::to_string_pretty(&analyzer.all_habit_stats())?);
        }
        StatsAction::All => {
            println!("{}", serde_json::to_string_pretty(&analyzer.overall_stats())?);
        }
    }
    Ok(())
}

pub fn calendar(year: Option<i32>, month: Option<u32>, clock: CliClock) -> CliResult {
    let tracker = open_tracker(clock)?;
    let today = tracker.today().date();
    let year = year.unwrap_or(today.year());
    let month = month.unwrap_or(today.month());
    let calendar = tracker
        .month_calendar(year, month)
        .ok_or_else(|| format!("invalid month: {year}-{month}"))?;

    println!("{year}-{month:02}");
    println!("  Su  Mo  Tu  We  Th  Fr  Sa");
    for week in calendar.cells.chunks(7) {
        let line: String = week
            .iter()
            .map(|cell| {
                if !cell.in_month {
                    "   .".to_string()
                } else {
                    let marker = match (cell.completed, cell.total) {
                        (_, 0) | (0, _) => ' ',
                        (done, total) if done == total => '*',
                        _ => '+',
                    };
                    format!(" {:>2}{marker}", cell.day.date().day())
                }
            })
            .collect();
        println!("{line}");
    }
    Ok(())
}
