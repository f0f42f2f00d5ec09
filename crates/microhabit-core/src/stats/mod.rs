//! Statistics module for MicroHabit
//!
//! Read-only analytics over a habit store: weekly progress, completion
//! rates, the month calendar grid and streak reminders.

mod calendar;
mod progress;

pub use calendar::{CalendarCell, MonthCalendar, GRID_CELLS};
pub use progress::{
    DayProgress, HabitStats, OverallStats, ProgressAnalyzer, StreakAtRisk,
};
