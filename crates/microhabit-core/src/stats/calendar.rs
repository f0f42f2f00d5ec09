//! Month grid for the calendar history view.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDay;
use crate::store::HabitStore;

/// Six weeks of seven days.
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub day: CalendarDay,
    pub in_month: bool,
    pub is_today: bool,
    pub completed: usize,
    pub total: usize,
    /// Ids of habits completed on this day, in habit order.
    pub completed_habits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    /// Sunday-first grid including the tail of the previous month and the
    /// head of the next.
    pub cells: Vec<CalendarCell>,
}

impl MonthCalendar {
    /// Build the grid for `year`/`month`. `None` for an invalid month.
    pub fn build(store: &HabitStore, year: i32, month: u32, today: CalendarDay) -> Option<Self> {
        let first = CalendarDay::from_ymd(year, month, 1)?;
        let leading = i64::from(first.date().weekday().num_days_from_sunday());
        let start = first.offset(-leading);

        let cells = (0..GRID_CELLS as i64)
            .map(|i| {
                let day = start.offset(i);
                let completed_habits: Vec<String> = store
                    .habits()
                    .iter()
                    .filter(|h| {
                        store
                            .progress(&h.id)
                            .is_some_and(|p| p.is_completed_on(day))
                    })
                    .map(|h| h.id.clone())
                    .collect();
                CalendarCell {
                    day,
                    in_month: day.date().month() == month && day.date().year() == year,
                    is_today: day == today,
                    completed: completed_habits.len(),
                    total: store.len(),
                    completed_habits,
                }
            })
            .collect();

        Some(Self { year, month, cells })
    }

    pub fn cell(&self, day: CalendarDay) -> Option<&CalendarCell> {
        self.cells.iter().find(|c| c.day == day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Habit;
    use chrono::{TimeZone, Utc};

    fn day(s: &str) -> CalendarDay {
        s.parse().unwrap()
    }

    #[test]
    fn grid_starts_on_sunday_and_spans_six_weeks() {
        let store = HabitStore::new();
        // February 2024 starts on a Thursday.
        let cal = MonthCalendar::build(&store, 2024, 2, day("2024-02-10")).unwrap();
        assert_eq!(cal.cells.len(), GRID_CELLS);
        assert_eq!(cal.cells[0].day, day("2024-01-28"));
        assert!(!cal.cells[0].in_month);
        assert!(cal.cells[4].in_month);
        assert_eq!(cal.cells[41].day, day("2024-03-09"));
        assert!(cal.cell(day("2024-02-10")).unwrap().is_today);
    }

    #[test]
    fn cells_count_completions() {
        let mut store = HabitStore::new();
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        store.add_habit(Habit::new("a", "A", at)).unwrap();
        store.add_habit(Habit::new("b", "B", at)).unwrap();
        store.complete_habit("a", day("2024-02-05")).unwrap();

        let cal = MonthCalendar::build(&store, 2024, 2, day("2024-02-10")).unwrap();
        let cell = cal.cell(day("2024-02-05")).unwrap();
        assert_eq!(cell.completed, 1);
        assert_eq!(cell.total, 2);
        assert_eq!(cell.completed_habits, vec!["a".to_string()]);
    }

    #[test]
    fn invalid_month_is_none() {
        assert!(MonthCalendar::build(&HabitStore::new(), 2024, 13, day("2024-02-10")).is_none());
    }
}
