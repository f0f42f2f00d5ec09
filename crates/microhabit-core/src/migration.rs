//! One-time upgrade from the legacy index-keyed storage layout.
//!
//! The legacy layout kept an ordered list of habit names plus three maps keyed
//! by list position: streak count, completed-today flag and last completed
//! date. Conversion assigns stable ids so positional keys never come back.
//!
//! Only the last completed date survives as history. The legacy layout never
//! stored more than that.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::calendar::CalendarDay;
use crate::habit::{Habit, HabitProgress};
use crate::store::HabitStore;

/// Legacy storage keys. Removed once migration succeeds.
pub mod legacy_keys {
    pub const HABITS: &str = "microhabit_habits";
    pub const STREAKS: &str = "microhabit_streaks";
    pub const COMPLETED: &str = "microhabit_completed";
    pub const DATES: &str = "microhabit_dates";

    pub const ALL: [&str; 4] = [HABITS, STREAKS, COMPLETED, DATES];
}

/// Legacy data as read from storage. Map keys are list positions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyData {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub streaks: HashMap<usize, u32>,
    #[serde(default)]
    pub completed: HashMap<usize, bool>,
    #[serde(default)]
    pub last_dates: HashMap<usize, String>,
}

impl LegacyData {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl HabitStore {
    /// Replace the store with habits converted from legacy data.
    ///
    /// History is seeded only from a recorded last date; the legacy
    /// completed-today flag is not turned into a date. Unparseable legacy
    /// dates are skipped with a warning.
    pub fn migrate_legacy_format(
        &mut self,
        legacy: &LegacyData,
        today: CalendarDay,
        now: DateTime<Utc>,
    ) {
        let mut habits = Vec::with_capacity(legacy.names.len());
        let mut progress = BTreeMap::new();

        for (index, name) in legacy.names.iter().enumerate() {
            let habit = Habit::new(Habit::generate_id(), name.clone(), now);

            let streak = legacy.streaks.get(&index).copied().unwrap_or(0);
            let last_date = legacy.last_dates.get(&index).and_then(|raw| {
                CalendarDay::parse(raw)
                    .map_err(|e| tracing::warn!(index, error = %e, "skipping legacy date"))
                    .ok()
            });

            let mut record = HabitProgress::new(habit.id.clone());
            record.completed_dates.extend(last_date);
            record.current_streak = streak;
            record.longest_streak = streak;
            record.last_completed_date = last_date;
            record.refresh_today(today);

            progress.insert(habit.id.clone(), record);
            habits.push(habit);
        }

        tracing::info!(habits = habits.len(), "migrated legacy habit data");
        self.replace(HabitStore::from_parts(habits, progress));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(s: &str) -> CalendarDay {
        s.parse().unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap()
    }

    fn read_legacy() -> LegacyData {
        LegacyData {
            names: vec!["Read".into()],
            streaks: HashMap::from([(0, 5)]),
            completed: HashMap::from([(0, true)]),
            last_dates: HashMap::from([(0, "2024-02-10".to_string())]),
        }
    }

    #[test]
    fn converts_single_legacy_habit() {
        let mut store = HabitStore::new();
        store.migrate_legacy_format(&read_legacy(), day("2024-02-10"), now());

        assert_eq!(store.len(), 1);
        let habit = &store.habits()[0];
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.category, "Other");

        let p = store.progress(&habit.id).unwrap();
        assert_eq!(p.current_streak, 5);
        assert_eq!(p.longest_streak, 5);
        assert_eq!(p.completed_dates.iter().copied().collect::<Vec<_>>(), vec![day("2024-02-10")]);
        assert!(p.completed_today);
    }

    #[test]
    fn completed_today_follows_the_clock_not_the_flag() {
        let mut store = HabitStore::new();
        store.migrate_legacy_format(&read_legacy(), day("2024-02-11"), now());
        let habit_id = store.habits()[0].id.clone();
        assert!(!store.progress(&habit_id).unwrap().completed_today);
    }

    #[test]
    fn accepts_legacy_date_strings_and_missing_entries() {
        let legacy = LegacyData {
            names: vec!["A".into(), "B".into()],
            streaks: HashMap::from([(1, 2)]),
            completed: HashMap::new(),
            last_dates: HashMap::from([(1, "Fri Feb 09 2024".to_string())]),
        };
        let mut store = HabitStore::new();
        store.migrate_legacy_format(&legacy, day("2024-02-10"), now());

        let a = store.progress(&store.habits()[0].id).unwrap();
        assert_eq!(a.current_streak, 0);
        assert!(a.last_completed_date.is_none());

        let b = store.progress(&store.habits()[1].id).unwrap();
        assert_eq!(b.last_completed_date, Some(day("2024-02-09")));
        assert!(b.streak_is_live(day("2024-02-10")));
    }

    #[test]
    fn completed_flag_without_a_date_adds_no_history() {
        let legacy = LegacyData {
            names: vec!["Read".into()],
            streaks: HashMap::from([(0, 5)]),
            completed: HashMap::from([(0, true)]),
            last_dates: HashMap::new(),
        };
        let mut store = HabitStore::new();
        store.migrate_legacy_format(&legacy, day("2024-02-10"), now());

        let p = store.progress(&store.habits()[0].id).unwrap();
        assert!(p.completed_dates.is_empty());
        assert!(p.last_completed_date.is_none());
        assert!(!p.completed_today);
        assert_eq!(p.current_streak, 5);
        assert_eq!(p.longest_streak, 5);
    }

    #[test]
    fn legacy_maps_deserialize_from_string_keys() {
        let streaks: HashMap<usize, u32> = serde_json::from_str(r#"{"0": 5, "2": 1}"#).unwrap();
        assert_eq!(streaks.get(&0), Some(&5));
        assert_eq!(streaks.get(&2), Some(&1));
    }
}
