//! Streak milestones and the plant growth stage shown for a streak.

use serde::{Deserialize, Serialize};

/// Streak lengths worth celebrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Three,
    Week,
    Month,
    Hundred,
}

impl Milestone {
    pub const ALL: [Milestone; 4] = [
        Milestone::Three,
        Milestone::Week,
        Milestone::Month,
        Milestone::Hundred,
    ];

    pub fn days(&self) -> u32 {
        match self {
            Milestone::Three => 3,
            Milestone::Week => 7,
            Milestone::Month => 30,
            Milestone::Hundred => 100,
        }
    }

    /// The milestone hit exactly at `streak`, if any.
    pub fn from_streak(streak: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.days() == streak)
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Milestone::Three => "⭐",
            Milestone::Week => "🔥",
            Milestone::Month => "🏆",
            Milestone::Hundred => "💯",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Milestone::Three => "Three in a row",
            Milestone::Week => "Week Milestone Unlocked",
            Milestone::Month => "Month Milestone Unlocked",
            Milestone::Hundred => "Hundred Days Milestone Unlocked",
        }
    }

    /// Notification text for `habit_name` reaching this milestone.
    pub fn message(&self, habit_name: &str) -> String {
        let tail = match self {
            Milestone::Three => "Momentum is building!",
            Milestone::Week => "The first week is always the hardest!",
            Milestone::Month => "A full month of consistency!",
            Milestone::Hundred => "Triple digits - unstoppable!",
        };
        format!(
            "{} {} days of \"{}\". {}",
            self.emoji(),
            self.days(),
            habit_name,
            tail
        )
    }
}

const PLANT_STAGES: [&str; 5] = ["🌱", "🌿", "🍀", "🌳", "🌲"];

/// Plant emoji for a streak, growing with its length.
pub fn growth_stage(streak: u32) -> &'static str {
    match streak {
        0 => "⚫",
        1..=3 => PLANT_STAGES[0],
        4..=7 => PLANT_STAGES[1],
        8..=14 => PLANT_STAGES[2],
        15..=30 => PLANT_STAGES[3],
        _ => PLANT_STAGES[4],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_hits_are_milestones() {
        assert_eq!(Milestone::from_streak(3), Some(Milestone::Three));
        assert_eq!(Milestone::from_streak(7), Some(Milestone::Week));
        assert_eq!(Milestone::from_streak(30), Some(Milestone::Month));
        assert_eq!(Milestone::from_streak(100), Some(Milestone::Hundred));
        assert_eq!(Milestone::from_streak(8), None);
        assert_eq!(Milestone::from_streak(0), None);
    }

    #[test]
    fn growth_stage_bands() {
        assert_eq!(growth_stage(0), "⚫");
        assert_eq!(growth_stage(3), "🌱");
        assert_eq!(growth_stage(7), "🌿");
        assert_eq!(growth_stage(14), "🍀");
        assert_eq!(growth_stage(30), "🌳");
        assert_eq!(growth_stage(31), "🌲");
    }

    #[test]
    fn message_mentions_habit_and_days() {
        let msg = Milestone::Week.message("Read");
        assert!(msg.contains("7 days"));
        assert!(msg.contains("\"Read\""));
    }
}
