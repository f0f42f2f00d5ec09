//! Application layer over the habit store.
//!
//! [`HabitTracker`] owns a [`HabitStore`] and keeps it in sync with an
//! injected [`Persistence`] provider. Every mutation is applied in memory
//! first and then written key by key; a failed write is returned to the
//! caller but the in-memory state stays authoritative for the session.

use chrono::{NaiveTime, Utc};
use serde::de::DeserializeOwned;

use crate::calendar::{CalendarDay, Clock};
use crate::error::{Result, ValidationError};
use crate::habit::{Habit, HabitProgress, NewHabit};
use crate::migration::{legacy_keys, LegacyData};
use crate::milestone::Milestone;
use crate::notify::{
    daily_reminder_text, fallback_message, MotivationContext, Notification, NotificationKind,
    Notifier, TextGenerator, FALLBACK_INSIGHT, FALLBACK_SUGGESTIONS,
};
use crate::snapshot::SNAPSHOT_VERSION;
use crate::stats::{MonthCalendar, ProgressAnalyzer};
use crate::storage::{keys, Config, Persistence};
use crate::store::HabitStore;

/// Result of completing a habit.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub progress: HabitProgress,
    /// Set when this completion made the streak hit a milestone.
    pub milestone: Option<Milestone>,
}

pub struct HabitTracker<P, C> {
    store: HabitStore,
    persistence: P,
    clock: C,
    config: Config,
    notifier: Option<Box<dyn Notifier>>,
    text_generator: Option<Box<dyn TextGenerator>>,
}

impl<P: Persistence, C: Clock> HabitTracker<P, C> {
    /// Load state from `persistence`, migrating legacy data when present.
    ///
    /// Missing or unreadable keys load as empty state. A migration whose
    /// result cannot be written back is kept in memory and logged; the
    /// legacy keys stay in place so the next load migrates again.
    pub fn load(persistence: P, clock: C, config: Config) -> Result<Self> {
        let mut tracker = Self {
            store: HabitStore::new(),
            persistence,
            clock,
            config,
            notifier: None,
            text_generator: None,
        };
        let today = tracker.today();

        let legacy = tracker.read_legacy();
        if !legacy.is_empty() {
            tracker
                .store
                .migrate_legacy_format(&legacy, today, Utc::now());
            match tracker.save_all() {
                Ok(()) => {
                    for key in legacy_keys::ALL {
                        if let Err(e) = tracker.persistence.remove(key) {
                            tracing::warn!(key, error = %e, "could not remove legacy key");
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "could not save migrated habits"),
            }
        } else {
            let habits: Vec<Habit> = tracker.read_key(keys::HABITS).unwrap_or_default();
            let progress = tracker.read_key(keys::HABIT_PROGRESS).unwrap_or_default();
            tracker.store = HabitStore::from_parts(habits, progress);
            tracker.store.refresh_today(today);
        }

        let version: Option<String> = tracker.read_key(keys::APP_VERSION);
        if version.as_deref() != Some(SNAPSHOT_VERSION) {
            if let Err(e) = tracker
                .persistence
                .set(keys::APP_VERSION, &SNAPSHOT_VERSION.into())
            {
                tracing::warn!(error = %e, "could not record app version");
            }
        }

        tracing::debug!(habits = tracker.store.len(), "habit tracker loaded");
        Ok(tracker)
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_text_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.text_generator = Some(generator);
        self
    }

    pub fn store(&self) -> &HabitStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn today(&self) -> CalendarDay {
        self.clock.today()
    }

    pub fn analyzer(&self) -> ProgressAnalyzer<'_> {
        ProgressAnalyzer::new(&self.store, self.today())
    }

    pub fn month_calendar(&self, year: i32, month: u32) -> Option<MonthCalendar> {
        MonthCalendar::build(&self.store, year, month, self.today())
    }

    /// Validate and add a habit with a fresh id.
    pub fn add_habit(&mut self, new_habit: NewHabit) -> Result<Habit> {
        let max = self.config.limits.max_habits;
        if self.store.len() >= max {
            return Err(ValidationError::TooManyHabits { max }.into());
        }
        self.validate(
            &new_habit.name,
            new_habit.description.as_deref(),
            new_habit.reminder_time.as_deref(),
        )?;

        let habit = new_habit.into_habit(Habit::generate_id(), Utc::now());
        self.store.add_habit(habit.clone())?;
        self.save_all()?;
        Ok(habit)
    }

    pub fn update_habit(&mut self, mut habit: Habit) -> Result<()> {
        self.validate(
            &habit.name,
            habit.description.as_deref(),
            habit.reminder_time.as_deref(),
        )?;
        habit.name = habit.name.trim().to_string();
        self.store.update_habit(habit)?;
        self.save_habits()
    }

    pub fn delete_habit(&mut self, habit_id: &str) -> Result<Habit> {
        let removed = self.store.delete_habit(habit_id)?;
        self.save_all()?;
        Ok(removed)
    }

    /// Complete a habit for today and fire a milestone notification if the
    /// streak just reached one.
    pub fn complete_habit(&mut self, habit_id: &str) -> Result<Completion> {
        let today = self.today();
        let already_done = self
            .store
            .progress(habit_id)
            .is_some_and(|p| p.is_completed_on(today));
        let progress = self.store.complete_habit(habit_id, today)?.clone();

        let milestone = if already_done {
            None
        } else {
            Milestone::from_streak(progress.current_streak)
        };
        if let Some(milestone) = milestone {
            self.announce_milestone(habit_id, milestone);
        }

        self.save_progress()?;
        Ok(Completion {
            progress,
            milestone,
        })
    }

    pub fn uncomplete_habit(&mut self, habit_id: &str) -> Result<HabitProgress> {
        let today = self.today();
        let progress = self.store.uncomplete_habit(habit_id, today)?.clone();
        self.save_progress()?;
        Ok(progress)
    }

    /// Compare today with the persisted last-seen day and roll over if it
    /// changed. Returns `true` when a rollover happened.
    pub fn check_new_day(&mut self) -> Result<bool> {
        let today = self.today();
        let last_seen: Option<String> = self.read_key(keys::LAST_DATE);
        if last_seen.as_deref() == Some(today.to_string().as_str()) {
            return Ok(false);
        }

        self.store.reset_daily_progress(today);
        self.save_progress()?;
        self.persistence
            .set(keys::LAST_DATE, &today.to_string().into())?;
        Ok(true)
    }

    /// Send streak reminders for habits about to lose a streak. Returns how
    /// many were delivered.
    pub fn send_streak_reminders(&self) -> usize {
        let prefs = &self.config.notifications;
        if !(prefs.enabled && prefs.streak_reminder) {
            return 0;
        }

        self.analyzer()
            .streaks_at_risk()
            .into_iter()
            .filter(|risk| {
                self.deliver(
                    NotificationKind::StreakReminder,
                    format!("Don't break your {}-day streak! 🔥", risk.streak),
                    format!("Complete \"{}\" to keep your amazing progress going.", risk.name),
                )
            })
            .count()
    }

    /// Whether the daily reminder should go out at `now`, local time.
    pub fn daily_reminder_due(&self, now: NaiveTime) -> bool {
        let prefs = &self.config.notifications;
        prefs.enabled
            && prefs.daily_reminder
            && prefs.reminder_at().is_some_and(|at| now >= at)
    }

    /// Remind about active habits still open today. Returns `true` when a
    /// notification was delivered.
    pub fn send_daily_reminder(&self) -> bool {
        let prefs = &self.config.notifications;
        if !(prefs.enabled && prefs.daily_reminder) {
            return false;
        }
        let today = self.today();
        let pending: Vec<String> = self
            .store
            .habits()
            .iter()
            .filter(|h| h.is_active)
            .filter(|h| !self.store.progress(&h.id).is_some_and(|p| p.is_completed_on(today)))
            .map(|h| h.name.clone())
            .collect();

        match daily_reminder_text(&pending) {
            Some((title, body)) => self.deliver(NotificationKind::DailyReminder, title, body),
            None => false,
        }
    }

    /// End-of-day summary of today's completions.
    pub fn send_daily_summary(&self) -> bool {
        let prefs = &self.config.notifications;
        if !(prefs.enabled && prefs.daily_summary) {
            return false;
        }
        let day = self.analyzer().day_progress(self.today());
        if day.total == 0 {
            return false;
        }
        let body = if day.completed == day.total {
            format!("All {} habits completed today! 🎉", day.total)
        } else {
            format!("{}/{} habits completed today ({}%)", day.completed, day.total, day.percentage)
        };
        self.deliver(NotificationKind::DailySummary, "📊 Daily summary".to_string(), body)
    }

    /// Deliver [`HabitTracker::motivational_message`] as a notification.
    pub fn send_motivational_notification(&self, user_name: Option<&str>) -> bool {
        let prefs = &self.config.notifications;
        if !(prefs.enabled && prefs.motivational_message) {
            return false;
        }
        let message = self.motivational_message(user_name);
        self.deliver(
            NotificationKind::Motivation,
            "MicroHabit Motivation 💪".to_string(),
            message,
        )
    }

    /// A short motivational line, from the text generator when available.
    pub fn motivational_message(&self, user_name: Option<&str>) -> String {
        let today = self.today();
        let context = MotivationContext {
            user_name: user_name.map(str::to_string),
            habits: self
                .store
                .habits()
                .iter()
                .filter(|h| h.is_active)
                .map(|h| {
                    let p = self.store.progress(&h.id);
                    (
                        h.name.clone(),
                        p.map_or(0, |p| p.current_streak),
                        p.is_some_and(|p| p.is_completed_on(today)),
                    )
                })
                .collect(),
        };

        match self.text_generator.as_deref() {
            Some(generator) => match generator.motivational_message(&context) {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => fallback_message(&context).to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "text generation failed");
                    fallback_message(&context).to_string()
                }
            },
            None => fallback_message(&context).to_string(),
        }
    }

    /// Generate an insight about the last seven days.
    ///
    /// A generated insight is stored under its own key; the built-in
    /// fallback is returned but never stored.
    pub fn weekly_insight(&self) -> String {
        let Some(generator) = self.text_generator.as_deref() else {
            return FALLBACK_INSIGHT.to_string();
        };
        let insight = match generator.weekly_insight(&self.analyzer().weekly_progress()) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return FALLBACK_INSIGHT.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "weekly insight generation failed");
                return FALLBACK_INSIGHT.to_string();
            }
        };

        let generated_at = Utc::now().to_rfc3339();
        for (key, value) in [
            (keys::WEEKLY_INSIGHT, insight.as_str()),
            (keys::LAST_INSIGHT, generated_at.as_str()),
        ] {
            if let Err(e) = self.persistence.set(key, &value.into()) {
                tracing::warn!(key, error = %e, "could not store weekly insight");
            }
        }
        insight
    }

    /// The last stored weekly insight, if any.
    pub fn saved_weekly_insight(&self) -> Option<String> {
        self.read_key(keys::WEEKLY_INSIGHT)
    }

    /// New habit ideas, skipping names already tracked.
    pub fn habit_suggestions(&self) -> Vec<String> {
        let current: Vec<String> = self.store.habits().iter().map(|h| h.name.clone()).collect();
        let is_new = |name: &String| {
            !name.trim().is_empty() && !current.iter().any(|c| c.eq_ignore_ascii_case(name.trim()))
        };

        let generated = match self.text_generator.as_deref() {
            Some(generator) => generator
                .habit_suggestions(&current)
                .map_err(|e| tracing::warn!(error = %e, "habit suggestion failed"))
                .unwrap_or_default(),
            None => Vec::new(),
        };
        let suggestions: Vec<String> = generated.into_iter().filter(is_new).collect();
        if !suggestions.is_empty() {
            return suggestions;
        }
        FALLBACK_SUGGESTIONS
            .iter()
            .map(|s| s.to_string())
            .filter(is_new)
            .collect()
    }

    pub fn export_json(&self) -> Result<String> {
        self.store.export_snapshot(Utc::now()).to_json_pretty()
    }

    /// Replace all habits and progress from an exported document.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        self.store.import_snapshot_str(json)?;
        self.store.refresh_today(self.today());
        self.save_all()
    }

    /// Remove every stored key the app owns and reset to empty.
    pub fn clear_all(&mut self) -> Result<()> {
        self.store = HabitStore::new();
        for key in keys::ALL.iter().chain(legacy_keys::ALL.iter()) {
            self.persistence.remove(key)?;
        }
        tracing::info!("all habit data cleared");
        Ok(())
    }

    fn announce_milestone(&self, habit_id: &str, milestone: Milestone) {
        let prefs = &self.config.notifications;
        if !(prefs.enabled && prefs.milestones) {
            return;
        }
        let Some(habit) = self.store.habit(habit_id) else {
            return;
        };
        self.deliver(
            NotificationKind::Milestone,
            milestone.title().to_string(),
            milestone.message(&habit.name),
        );
    }

    /// Hand a notification to the notifier, if any. Failures are logged.
    fn deliver(&self, kind: NotificationKind, title: String, body: String) -> bool {
        let Some(notifier) = self.notifier.as_deref() else {
            return false;
        };
        let prefs = &self.config.notifications;
        let notification = Notification {
            kind,
            title,
            body,
            sound: prefs.sound,
            vibration: prefs.vibration,
        };
        match notifier.notify(&notification) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(?kind, error = %e, "notification failed");
                false
            }
        }
    }

    fn validate(
        &self,
        name: &str,
        description: Option<&str>,
        reminder_time: Option<&str>,
    ) -> Result<(), ValidationError> {
        let limits = &self.config.limits;
        let len = name.trim().chars().count();
        if len < limits.min_name_len || len > limits.max_name_len {
            return Err(ValidationError::NameLength {
                len,
                min: limits.min_name_len,
                max: limits.max_name_len,
            });
        }
        if let Some(description) = description {
            let len = description.chars().count();
            if len > limits.max_description_len {
                return Err(ValidationError::DescriptionLength {
                    len,
                    max: limits.max_description_len,
                });
            }
        }
        if let Some(time) = reminder_time {
            NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
                ValidationError::InvalidValue {
                    field: "reminder_time".to_string(),
                    message: format!("'{time}' is not HH:MM"),
                }
            })?;
        }
        Ok(())
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.persistence.get(key) {
            Ok(Some(value)) => serde_json::from_value(value)
                .map_err(|e| tracing::warn!(key, error = %e, "ignoring unreadable stored value"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    fn read_legacy(&self) -> LegacyData {
        LegacyData {
            names: self.read_key(legacy_keys::HABITS).unwrap_or_default(),
            streaks: self.read_key(legacy_keys::STREAKS).unwrap_or_default(),
            completed: self.read_key(legacy_keys::COMPLETED).unwrap_or_default(),
            last_dates: self.read_key(legacy_keys::DATES).unwrap_or_default(),
        }
    }

    fn save_habits(&self) -> Result<()> {
        let value = serde_json::to_value(self.store.habits())?;
        self.persistence.set(keys::HABITS, &value)?;
        Ok(())
    }

    fn save_progress(&self) -> Result<()> {
        let value = serde_json::to_value(self.store.progress_map())?;
        self.persistence.set(keys::HABIT_PROGRESS, &value)?;
        Ok(())
    }

    /// Write both keys even if the first write fails; report the first error.
    fn save_all(&self) -> Result<()> {
        let habits = self.save_habits();
        let progress = self.save_progress();
        habits.and(progress)
    }
}

