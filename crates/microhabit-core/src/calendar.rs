//! Calendar days and the clock that supplies "today".
//!
//! Streak bookkeeping works at day granularity only. The clock resolves the
//! viewer's local timezone once; nothing downstream converts timezones.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const ISO_FORMAT: &str = "%Y-%m-%d";
/// Format written by the legacy storage layer, e.g. `Sat Feb 10 2024`.
const LEGACY_FORMAT: &str = "%a %b %d %Y";

/// A single calendar day, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year/month/day; `None` if the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The day immediately before this one.
    pub fn pred(&self) -> Self {
        Self(self.0.pred_opt().unwrap_or(NaiveDate::MIN))
    }

    /// The day immediately after this one.
    pub fn succ(&self) -> Self {
        Self(self.0.succ_opt().unwrap_or(NaiveDate::MAX))
    }

    /// Shift by a signed number of days, saturating at chrono's range.
    pub fn offset(&self, days: i64) -> Self {
        let shifted = self
            .0
            .checked_add_signed(chrono::Duration::days(days))
            .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX });
        Self(shifted)
    }

    /// Whole days from `earlier` to `self` (negative if `earlier` is later).
    pub fn days_since(&self, earlier: CalendarDay) -> i64 {
        (self.0 - earlier.0).num_days()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Parse an ISO day or the legacy `Www Mmm DD YYYY` form.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        NaiveDate::parse_from_str(trimmed, ISO_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(trimmed, LEGACY_FORMAT))
            .map(Self)
            .map_err(|e| ValidationError::InvalidValue {
                field: "date".to_string(),
                message: format!("'{trimmed}' is not a calendar day: {e}"),
            })
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_FORMAT))
    }
}

impl FromStr for CalendarDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Source of "today".
pub trait Clock {
    fn today(&self) -> CalendarDay;
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDay {
        CalendarDay(Local::now().date_naive())
    }
}

/// A clock pinned to a settable day. Clones share the same day, so a test can
/// keep a handle and advance time after moving the clock into a tracker.
#[derive(Debug, Clone)]
pub struct FixedClock {
    day: Rc<Cell<CalendarDay>>,
}

impl FixedClock {
    pub fn new(day: CalendarDay) -> Self {
        Self {
            day: Rc::new(Cell::new(day)),
        }
    }

    pub fn set(&self, day: CalendarDay) {
        self.day.set(day);
    }

    pub fn advance(&self, days: i64) {
        self.day.set(self.day.get().offset(days));
    }
}

impl Clock for FixedClock {
    fn today(&self) -> CalendarDay {
        self.day.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> CalendarDay {
        s.parse().unwrap()
    }

    #[test]
    fn pred_crosses_month_and_year_boundaries() {
        assert_eq!(day("2024-03-01").pred(), day("2024-02-29"));
        assert_eq!(day("2024-01-01").pred(), day("2023-12-31"));
        assert_eq!(day("2023-12-31").succ(), day("2024-01-01"));
    }

    #[test]
    fn parses_legacy_date_strings() {
        assert_eq!(day("Sat Feb 10 2024"), day("2024-02-10"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(CalendarDay::parse("yesterday").is_err());
        assert!(CalendarDay::parse("2024-02-30").is_err());
    }

    #[test]
    fn serializes_as_iso_string() {
        let json = serde_json::to_string(&day("2024-01-05")).unwrap();
        assert_eq!(json, "\"2024-01-05\"");
        let back: CalendarDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day("2024-01-05"));
    }

    #[test]
    fn fixed_clock_clones_share_the_day() {
        let clock = FixedClock::new(day("2024-01-01"));
        let handle = clock.clone();
        handle.advance(2);
        assert_eq!(clock.today(), day("2024-01-03"));
    }

    #[test]
    fn days_since_counts_whole_days() {
        assert_eq!(day("2024-01-10").days_since(day("2024-01-01")), 9);
        assert_eq!(day("2024-01-01").days_since(day("2024-01-10")), -9);
    }
}
