pub mod config;
pub mod data;
pub mod habit;
pub mod progress;
pub mod stats;

use microhabit_core::{
    CalendarDay, Clock, Config, FixedClock, HabitTracker, SqliteStorage, SystemClock,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;
pub type Tracker = HabitTracker<SqliteStorage, CliClock>;

/// System clock unless `--today` pins the day.
pub enum CliClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl CliClock {
    pub fn from_override(today: Option<CalendarDay>) -> Self {
        match today {
            Some(day) => CliClock::Fixed(FixedClock::new(day)),
            None => CliClock::System(SystemClock),
        }
    }
}

impl Clock for CliClock {
    fn today(&self) -> CalendarDay {
        match self {
            CliClock::System(clock) => clock.today(),
            CliClock::Fixed(clock) => clock.today(),
        }
    }
}

/// Open storage, load state and run the startup day check.
pub fn open_tracker(clock: CliClock) -> Result<Tracker, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let storage = SqliteStorage::open()?;
    let mut tracker = HabitTracker::load(storage, clock, config)?;
    if tracker.check_new_day()? {
        tracing::info!(day = %tracker.today(), "new day");
    }
    Ok(tracker)
}

/// Resolve a habit by id, falling back to a case-insensitive name match.
pub fn resolve_habit_id(tracker: &Tracker, reference: &str) -> Result<String, String> {
    let store = tracker.store();
    if store.contains(reference) {
        return Ok(reference.to_string());
    }
    let matches: Vec<_> = store
        .habits()
        .iter()
        .filter(|h| h.name.eq_ignore_ascii_case(reference.trim()))
        .collect();
    match matches.as_slice() {
        [habit] => Ok(habit.id.clone()),
        [] => Err(format!("no habit with id or name '{reference}'")),
        _ => Err(format!("'{reference}' matches several habits; use the id")),
    }
}
