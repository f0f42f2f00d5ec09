//! Weekly progress and per-habit completion statistics.
//!
//! All figures are computed from `completed_dates`, so they are honest even
//! when a stored streak has gone stale.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDay;
use crate::habit::{Difficulty, Habit};
use crate::store::HabitStore;

/// Habits with a completion rate below this are "struggling".
const STRUGGLING_RATE: u32 = 50;
/// Streaks at least this long get a reminder when not yet completed today.
const AT_RISK_MIN_STREAK: u32 = 3;
const TOP_N: usize = 3;

/// Completion counts for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayProgress {
    pub day: CalendarDay,
    /// Short weekday label, `Mon`..`Sun`.
    pub weekday: String,
    pub completed: usize,
    pub total: usize,
    /// Rounded percentage, 0..=100.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStats {
    pub habit_id: String,
    pub name: String,
    pub difficulty: Difficulty,
    /// Completions over days since creation, rounded percentage.
    pub completion_rate: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_completions: usize,
    pub avg_completion_rate: u32,
    /// Sum of current streaks across habits.
    pub total_streaks: u32,
    pub longest_current_streak: u32,
    /// Days in the last seven where every habit was completed.
    pub perfect_days: usize,
    /// Highest completion rates first.
    pub best_habits: Vec<HabitStats>,
    /// Below 50%, lowest first.
    pub struggling_habits: Vec<HabitStats>,
}

/// A habit whose streak will break unless it is completed today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakAtRisk {
    pub habit_id: String,
    pub name: String,
    pub streak: u32,
}

/// Read-only analytics over a store as of a given day.
pub struct ProgressAnalyzer<'a> {
    store: &'a HabitStore,
    today: CalendarDay,
}

impl<'a> ProgressAnalyzer<'a> {
    pub fn new(store: &'a HabitStore, today: CalendarDay) -> Self {
        Self { store, today }
    }

    /// Completion counts for `day` across all habits.
    pub fn day_progress(&self, day: CalendarDay) -> DayProgress {
        let total = self.store.len();
        let completed = self
            .store
            .habits()
            .iter()
            .filter(|h| {
                self.store
                    .progress(&h.id)
                    .is_some_and(|p| p.is_completed_on(day))
            })
            .count();
        DayProgress {
            day,
            weekday: day.weekday().to_string(),
            completed,
            total,
            percentage: percentage(completed, total),
        }
    }

    /// The seven days ending today, oldest first.
    pub fn weekly_progress(&self) -> Vec<DayProgress> {
        (0..7)
            .rev()
            .map(|back| self.day_progress(self.today.offset(-back)))
            .collect()
    }

    pub fn habit_stats(&self, habit: &Habit) -> HabitStats {
        let progress = self.store.progress(&habit.id);
        let total_completions = progress.map_or(0, |p| p.total_completions());
        let tracked_days = self.today.days_since(habit.created_day()).max(0) + 1;
        let completion_rate = percentage(total_completions, tracked_days as usize).min(100);

        HabitStats {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            difficulty: habit.difficulty,
            completion_rate,
            current_streak: progress.map_or(0, |p| p.current_streak),
            longest_streak: progress.map_or(0, |p| p.longest_streak),
            total_completions,
        }
    }

    pub fn all_habit_stats(&self) -> Vec<HabitStats> {
        self.store
            .habits()
            .iter()
            .map(|h| self.habit_stats(h))
            .collect()
    }

    pub fn overall_stats(&self) -> OverallStats {
        let stats = self.all_habit_stats();
        if stats.is_empty() {
            return OverallStats::default();
        }

        let rate_sum: u64 = stats.iter().map(|s| u64::from(s.completion_rate)).sum();
        let avg_completion_rate = (rate_sum as f64 / stats.len() as f64).round() as u32;

        let mut best = stats.clone();
        best.sort_by(|a, b| b.completion_rate.cmp(&a.completion_rate));
        best.truncate(TOP_N);

        let mut struggling: Vec<HabitStats> = stats
            .iter()
            .filter(|s| s.completion_rate < STRUGGLING_RATE)
            .cloned()
            .collect();
        struggling.sort_by(|a, b| a.completion_rate.cmp(&b.completion_rate));
        struggling.truncate(TOP_N);

        OverallStats {
            total_completions: stats.iter().map(|s| s.total_completions).sum(),
            avg_completion_rate,
            total_streaks: stats
                .iter()
                .map(|s| s.current_streak)
                .fold(0, u32::saturating_add),
            longest_current_streak: stats.iter().map(|s| s.current_streak).max().unwrap_or(0),
            perfect_days: self
                .weekly_progress()
                .iter()
                .filter(|d| d.percentage == 100)
                .count(),
            best_habits: best,
            struggling_habits: struggling,
        }
    }

    /// Active habits with a live streak of 3+ days not yet completed today.
    pub fn streaks_at_risk(&self) -> Vec<StreakAtRisk> {
        self.store
            .habits()
            .iter()
            .filter(|h| h.is_active)
            .filter_map(|h| {
                let p = self.store.progress(&h.id)?;
                let at_risk = p.current_streak >= AT_RISK_MIN_STREAK
                    && !p.is_completed_on(self.today)
                    && p.streak_is_live(self.today);
                at_risk.then(|| StreakAtRisk {
                    habit_id: h.id.clone(),
                    name: h.name.clone(),
                    streak: p.current_streak,
                })
            })
            .collect()
    }
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}
