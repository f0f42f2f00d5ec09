//! Habit and per-habit progress records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::CalendarDay;
use crate::error::ValidationError;

pub const DEFAULT_EMOJI: &str = "🎯";
pub const DEFAULT_CATEGORY: &str = "Other";

/// How hard a habit is for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ValidationError::InvalidValue {
                field: "difficulty".to_string(),
                message: format!("'{s}' is not one of easy, medium, hard"),
            }),
        }
    }
}

/// A daily habit the user tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Wall-clock reminder time, `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_emoji() -> String {
    DEFAULT_EMOJI.to_string()
}
fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}
fn default_true() -> bool {
    true
}

impl Habit {
    /// A habit with default metadata and the given id.
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            emoji: default_emoji(),
            category: default_category(),
            difficulty: Difficulty::default(),
            reminder_time: None,
            is_active: true,
            created_at,
            target_days: None,
            notes: None,
        }
    }

    /// Fresh opaque id for a new habit.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// The calendar day the habit was created on (UTC).
    pub fn created_day(&self) -> CalendarDay {
        CalendarDay::new(self.created_at.date_naive())
    }
}

/// User input for creating a habit; the tracker assigns id and timestamp.
#[derive(Debug, Clone, Default)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub category: Option<String>,
    pub difficulty: Difficulty,
    pub reminder_time: Option<String>,
    pub target_days: Option<u32>,
    pub notes: Option<String>,
}

impl NewHabit {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn into_habit(self, id: String, created_at: DateTime<Utc>) -> Habit {
        Habit {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            emoji: self.emoji.unwrap_or_else(default_emoji),
            category: self.category.unwrap_or_else(default_category),
            difficulty: self.difficulty,
            reminder_time: self.reminder_time,
            is_active: true,
            created_at,
            target_days: self.target_days,
            notes: self.notes,
        }
    }
}

/// Completion history and streak counters for one habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitProgress {
    pub habit_id: String,
    #[serde(default)]
    pub completed_dates: BTreeSet<CalendarDay>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub completed_today: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_date: Option<CalendarDay>,
}

impl HabitProgress {
    /// Empty progress for a newly created habit.
    pub fn new(habit_id: impl Into<String>) -> Self {
        Self {
            habit_id: habit_id.into(),
            completed_dates: BTreeSet::new(),
            current_streak: 0,
            longest_streak: 0,
            completed_today: false,
            last_completed_date: None,
        }
    }

    pub fn is_completed_on(&self, day: CalendarDay) -> bool {
        self.completed_dates.contains(&day)
    }

    pub fn total_completions(&self) -> usize {
        self.completed_dates.len()
    }

    /// Latest completed day, read from the history itself.
    pub fn latest_completed(&self) -> Option<CalendarDay> {
        self.completed_dates.iter().next_back().copied()
    }

    /// True when the streak can still be extended: the last completion was
    /// today or yesterday.
    pub fn streak_is_live(&self, today: CalendarDay) -> bool {
        matches!(self.last_completed_date, Some(last) if last == today || last == today.pred())
    }

    pub(crate) fn refresh_today(&mut self, today: CalendarDay) {
        self.completed_today = self.is_completed_on(today);
    }
}
