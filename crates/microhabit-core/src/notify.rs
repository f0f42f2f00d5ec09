//! Outbound collaborators: notification delivery and generated text.
//!
//! Both are fire-and-forget. The tracker calls them after a state change has
//! been applied and logs, then discards, any error they return.

use thiserror::Error;

use crate::stats::DayProgress;

/// Failure reported by a collaborator. Never propagated past the tracker.
#[derive(Error, Debug)]
#[error("{service}: {message}")]
pub struct CollaboratorError {
    pub service: String,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// What a notification is about. Lets a platform replace an older
/// notification of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    DailyReminder,
    StreakReminder,
    Milestone,
    Motivation,
    DailySummary,
}

/// A user-facing notification with the delivery preferences from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub sound: bool,
    pub vibration: bool,
}

/// Delivers a user-facing notification.
pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), CollaboratorError>;
}

/// Current standing passed to a text generator.
#[derive(Debug, Clone, Default)]
pub struct MotivationContext {
    pub user_name: Option<String>,
    /// `(habit name, current streak, completed today)` per active habit.
    pub habits: Vec<(String, u32, bool)>,
}

impl MotivationContext {
    pub fn completed_count(&self) -> usize {
        self.habits.iter().filter(|(_, _, done)| *done).count()
    }

    pub fn total_streak_days(&self) -> u32 {
        self.habits
            .iter()
            .map(|(_, streak, _)| *streak)
            .fold(0, u32::saturating_add)
    }
}

/// Produces short generated text.
pub trait TextGenerator {
    fn motivational_message(&self, context: &MotivationContext) -> Result<String, CollaboratorError>;

    /// One-line summary of the last seven days, oldest day first.
    fn weekly_insight(&self, week: &[DayProgress]) -> Result<String, CollaboratorError>;

    /// New habit ideas that do not repeat `current`.
    fn habit_suggestions(&self, current: &[String]) -> Result<Vec<String>, CollaboratorError>;
}

const FALLBACK_MESSAGES: [&str; 4] = [
    "🌱 Your consistency is building something beautiful!",
    "🌱 Keep growing, you're doing amazing!",
    "✨ Small steps every day add up to big changes.",
    "🔥 Progress, not perfection. You've got this!",
];

pub const FALLBACK_INSIGHT: &str = "📈 Your dedication this week is inspiring!";

pub const FALLBACK_SUGGESTIONS: [&str; 5] = ["Drink water", "Exercise", "Read", "Meditate", "Journal"];

/// Built-in line used when no generator is configured or it fails.
pub fn fallback_message(context: &MotivationContext) -> &'static str {
    let total = context.habits.len();
    if total == 0 {
        return FALLBACK_MESSAGES[2];
    }
    let done = context.completed_count();
    if done == total {
        FALLBACK_MESSAGES[1]
    } else if done == 0 {
        FALLBACK_MESSAGES[3]
    } else {
        FALLBACK_MESSAGES[0]
    }
}

/// Title and body reminding about habits still open today. `None` when
/// nothing is pending.
pub fn daily_reminder_text(pending: &[String]) -> Option<(String, String)> {
    match pending {
        [] => None,
        [only] => Some((
            format!("Don't forget: {only}"),
            "Keep your streak going! 🔥".to_string(),
        )),
        [first, second, rest @ ..] => Some((
            format!("{} habits waiting for you!", pending.len()),
            format!(
                "Complete: {first}, {second}{}",
                if rest.is_empty() { "" } else { "..." }
            ),
        )),
    }
}
