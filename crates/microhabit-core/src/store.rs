//! In-memory habit progress store.
//!
//! Owns the habit list and one [`HabitProgress`] per habit. Every operation
//! checks its preconditions before mutating, so an `Err` leaves the store
//! exactly as it was.
//!
//! Streaks are recomputed lazily: a completion looks at whether the previous
//! completion was yesterday. Nothing zeroes a streak when a day passes
//! without a completion; the stored value goes stale until the next
//! completion recomputes it.

use std::collections::BTreeMap;

use crate::calendar::CalendarDay;
use crate::error::{CoreError, Result, ValidationError};
use crate::habit::{Habit, HabitProgress};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitStore {
    habits: Vec<Habit>,
    progress: BTreeMap<String, HabitProgress>,
}

impl HabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted parts, dropping orphan progress records
    /// and creating empty progress for habits that have none.
    pub fn from_parts(habits: Vec<Habit>, mut progress: BTreeMap<String, HabitProgress>) -> Self {
        let mut reconciled = BTreeMap::new();
        for habit in &habits {
            let mut record = progress
                .remove(&habit.id)
                .unwrap_or_else(|| HabitProgress::new(habit.id.clone()));
            record.habit_id = habit.id.clone();
            reconciled.insert(habit.id.clone(), record);
        }
        if !progress.is_empty() {
            tracing::debug!(dropped = progress.len(), "dropping orphan progress records");
        }
        Self {
            habits,
            progress: reconciled,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn progress_map(&self) -> &BTreeMap<String, HabitProgress> {
        &self.progress
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    pub fn progress(&self, habit_id: &str) -> Option<&HabitProgress> {
        self.progress.get(habit_id)
    }

    pub fn contains(&self, habit_id: &str) -> bool {
        self.progress.contains_key(habit_id)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    /// Append a habit and create its empty progress record.
    ///
    /// # Errors
    /// `DuplicateId` if a habit with the same id exists.
    pub fn add_habit(&mut self, habit: Habit) -> Result<()> {
        if self.contains(&habit.id) {
            return Err(CoreError::duplicate_id(&habit.id));
        }
        tracing::debug!(habit_id = %habit.id, name = %habit.name, "adding habit");
        self.progress
            .insert(habit.id.clone(), HabitProgress::new(habit.id.clone()));
        self.habits.push(habit);
        Ok(())
    }

    /// Replace the stored habit with the same id. Progress is untouched.
    ///
    /// # Errors
    /// `NotFound` if no habit has that id.
    pub fn update_habit(&mut self, habit: Habit) -> Result<()> {
        let slot = self
            .habits
            .iter_mut()
            .find(|h| h.id == habit.id)
            .ok_or_else(|| CoreError::not_found(&habit.id))?;
        tracing::debug!(habit_id = %habit.id, "updating habit");
        *slot = habit;
        Ok(())
    }

    /// Remove a habit together with its progress record.
    ///
    /// # Errors
    /// `NotFound` if no habit has that id.
    pub fn delete_habit(&mut self, habit_id: &str) -> Result<Habit> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == habit_id)
            .ok_or_else(|| CoreError::not_found(habit_id))?;
        tracing::debug!(habit_id, "deleting habit");
        self.progress.remove(habit_id);
        Ok(self.habits.remove(index))
    }

    /// Mark a habit complete for `today`.
    ///
    /// Completing a day that is already completed changes nothing. Returns
    /// the resulting progress so callers can inspect the new streak.
    ///
    /// # Errors
    /// `NotFound` if no habit has that id. `Validation` if `today` is earlier
    /// than the last completion, which would leave history out of order.
    pub fn complete_habit(&mut self, habit_id: &str, today: CalendarDay) -> Result<&HabitProgress> {
        let progress = self
            .progress
            .get_mut(habit_id)
            .ok_or_else(|| CoreError::not_found(habit_id))?;

        if progress.is_completed_on(today) {
            progress.completed_today = true;
            return Ok(progress);
        }
        if let Some(last) = progress.last_completed_date {
            if today < last {
                return Err(ValidationError::InvalidValue {
                    field: "day".to_string(),
                    message: format!("{today} is before the last completion on {last}"),
                }
                .into());
            }
        }

        progress.completed_dates.insert(today);
        progress.current_streak = if progress.last_completed_date == Some(today.pred()) {
            progress.current_streak.saturating_add(1)
        } else {
            1
        };
        progress.longest_streak = progress.longest_streak.max(progress.current_streak);
        progress.completed_today = true;
        progress.last_completed_date = Some(today);

        tracing::debug!(
            habit_id,
            day = %today,
            streak = progress.current_streak,
            "habit completed"
        );
        Ok(progress)
    }

    /// Undo today's completion.
    ///
    /// Only today can be undone. The streak is decremented rather than
    /// recomputed from history; `longest_streak` keeps its best value.
    ///
    /// # Errors
    /// `NotFound` if no habit has that id.
    pub fn uncomplete_habit(&mut self, habit_id: &str, today: CalendarDay) -> Result<&HabitProgress> {
        let progress = self
            .progress
            .get_mut(habit_id)
            .ok_or_else(|| CoreError::not_found(habit_id))?;

        if !progress.is_completed_on(today) {
            progress.completed_today = false;
            return Ok(progress);
        }

        progress.completed_dates.remove(&today);
        progress.current_streak = progress.current_streak.saturating_sub(1);
        progress.completed_today = false;
        progress.last_completed_date = progress.latest_completed();

        tracing::debug!(
            habit_id,
            day = %today,
            streak = progress.current_streak,
            "habit completion undone"
        );
        Ok(progress)
    }

    /// Recompute `completed_today` for every habit against a new day.
    ///
    /// Streaks and history are left alone.
    pub fn reset_daily_progress(&mut self, today: CalendarDay) {
        self.refresh_today(today);
        tracing::info!(day = %today, habits = self.progress.len(), "daily progress reset");
    }

    pub(crate) fn refresh_today(&mut self, today: CalendarDay) {
        for progress in self.progress.values_mut() {
            progress.refresh_today(today);
        }
    }

    /// Replace the whole state. Callers have already validated `other`.
    pub(crate) fn replace(&mut self, other: HabitStore) {
        *self = other;
    }
}
