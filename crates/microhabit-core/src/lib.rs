//! # MicroHabit Core Library
//!
//! This library provides the core logic for the MicroHabit daily habit
//! tracker. All operations are available via the standalone CLI binary; any
//! other front end is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Store**: the habit list and per-habit progress, with the streak and
//!   daily-rollover rules
//! - **Tracker**: wires the store to persistence, a clock and optional
//!   notification/text collaborators
//! - **Storage**: key/value persistence (SQLite or in-memory) and TOML config
//! - **Stats**: weekly progress, completion rates and the month calendar
//!
//! ## Key Components
//!
//! - [`HabitStore`]: habit/progress state and streak rules
//! - [`HabitTracker`]: application layer with persistence
//! - [`Persistence`]: trait for named JSON blob storage
//! - [`Clock`]: source of "today"

pub mod calendar;
pub mod error;
pub mod habit;
pub mod migration;
pub mod milestone;
pub mod notify;
pub mod snapshot;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tracker;

pub use calendar::{CalendarDay, Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use habit::{Difficulty, Habit, HabitProgress, NewHabit};
pub use migration::LegacyData;
pub use milestone::{growth_stage, Milestone};
pub use notify::{
    CollaboratorError, MotivationContext, Notification, NotificationKind, Notifier, TextGenerator,
};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use stats::{MonthCalendar, ProgressAnalyzer};
pub use storage::{Config, MemoryStorage, Persistence, SqliteStorage};
pub use store::HabitStore;
pub use tracker::{Completion, HabitTracker};
