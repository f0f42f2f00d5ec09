//! Versioned export/import of the full habit state.
//!
//! The export document is the compatibility-bearing artifact:
//!
//! ```json
//! { "habits": [...], "habitProgress": { "<id>": {...} },
//!   "exportDate": "2024-01-05T10:00:00Z", "version": "2.0.0" }
//! ```

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::habit::{Habit, HabitProgress};
use crate::store::HabitStore;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: &str = "2.0.0";
const SUPPORTED_MAJOR: &str = "2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub habits: Vec<Habit>,
    pub habit_progress: BTreeMap<String, HabitProgress>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl Snapshot {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Wire shape accepted on import. `exportDate` and `version` are optional so
/// that older backups still load.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingSnapshot {
    habits: Vec<Habit>,
    habit_progress: BTreeMap<String, HabitProgress>,
    #[serde(default)]
    version: Option<String>,
}

impl HabitStore {
    pub fn export_snapshot(&self, exported_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            habits: self.habits().to_vec(),
            habit_progress: self.progress_map().clone(),
            export_date: exported_at,
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    /// Replace the store with the contents of an exported document.
    ///
    /// Progress records without a matching habit are dropped.
    ///
    /// # Errors
    /// `InvalidFormat` if the document is not a snapshot; the store is left
    /// untouched in that case.
    pub fn import_snapshot(&mut self, value: serde_json::Value) -> Result<()> {
        let incoming = parse_snapshot(value)?;
        let habit_count = incoming.habits.len();
        let store = HabitStore::from_parts(incoming.habits, incoming.habit_progress);
        self.replace(store);
        tracing::info!(habits = habit_count, "snapshot imported");
        Ok(())
    }

    /// Same as [`HabitStore::import_snapshot`] but from raw JSON text.
    pub fn import_snapshot_str(&mut self, json: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidFormat(format!("not valid JSON: {e}")))?;
        self.import_snapshot(value)
    }
}

fn parse_snapshot(value: serde_json::Value) -> Result<IncomingSnapshot> {
    let obj = value
        .as_object()
        .ok_or_else(|| CoreError::InvalidFormat("top level must be an object".into()))?;
    if !obj.get("habits").is_some_and(|v| v.is_array()) {
        return Err(CoreError::InvalidFormat("'habits' must be an array".into()));
    }
    if !obj.get("habitProgress").is_some_and(|v| v.is_object()) {
        return Err(CoreError::InvalidFormat(
            "'habitProgress' must be an object".into(),
        ));
    }

    let incoming: IncomingSnapshot =
        serde_json::from_value(value).map_err(|e| CoreError::InvalidFormat(e.to_string()))?;

    if let Some(version) = incoming.version.as_deref() {
        let major = version.split('.').next().unwrap_or_default();
        if major != SUPPORTED_MAJOR {
            return Err(CoreError::InvalidFormat(format!(
                "unsupported snapshot version {version}"
            )));
        }
    }

    {
        let mut seen = HashSet::new();
        for habit in &incoming.habits {
            if !seen.insert(habit.id.as_str()) {
                return Err(CoreError::InvalidFormat(format!(
                    "duplicate habit id '{}'",
                    habit.id
                )));
            }
        }
    }

    Ok(incoming)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarDay;
    use chrono::TimeZone;
    use serde_json::json;

    fn day(s: &str) -> CalendarDay {
        s.parse().unwrap()
    }

    fn sample_store() -> HabitStore {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut store = HabitStore::new();
        store.add_habit(Habit::new("b", "Walk", at)).unwrap();
        store.add_habit(Habit::new("a", "Read", at)).unwrap();
        store.complete_habit("a", day("2024-01-01")).unwrap();
        store.complete_habit("a", day("2024-01-02")).unwrap();
        store
    }

    #[test]
    fn export_then_import_reproduces_state() {
        let store = sample_store();
        let exported_at = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let json = store.export_snapshot(exported_at).to_json_pretty().unwrap();

        let mut restored = HabitStore::new();
        restored.import_snapshot_str(&json).unwrap();
        assert_eq!(restored, store);
        assert_eq!(restored.habits()[0].id, "b");
    }

    #[test]
    fn export_document_has_expected_keys() {
        let exported_at = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let value = serde_json::to_value(sample_store().export_snapshot(exported_at)).unwrap();
        assert_eq!(value["version"], "2.0.0");
        assert_eq!(value["exportDate"], "2024-01-02T12:00:00Z");
        assert_eq!(value["habitProgress"]["a"]["currentStreak"], 2);
        assert_eq!(value["habitProgress"]["a"]["lastCompletedDate"], "2024-01-02");
    }

    #[test]
    fn malformed_import_leaves_state_untouched() {
        let mut store = sample_store();
        let before = store.clone();

        for bad in [
            json!([1, 2, 3]),
            json!({ "habits": {} , "habitProgress": {} }),
            json!({ "habits": [] }),
            json!({ "habits": [{ "name": "no id" }], "habitProgress": {} }),
            json!({ "habits": [], "habitProgress": {}, "version": "1.0.0" }),
        ] {
            let err = store.import_snapshot(bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidFormat(_)));
        }
        assert!(matches!(
            store.import_snapshot_str("{not json"),
            Err(CoreError::InvalidFormat(_))
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn duplicate_habit_ids_are_rejected() {
        let mut store = HabitStore::new();
        let doc = json!({
            "habits": [
                { "id": "x", "name": "A", "createdAt": "2024-01-01T00:00:00Z" },
                { "id": "x", "name": "B", "createdAt": "2024-01-01T00:00:00Z" }
            ],
            "habitProgress": {}
        });
        assert!(matches!(
            store.import_snapshot(doc),
            Err(CoreError::InvalidFormat(_))
        ));
    }

    #[test]
    fn orphan_progress_is_dropped_and_missing_progress_created() {
        let mut store = HabitStore::new();
        let doc = json!({
            "habits": [{ "id": "x", "name": "A", "createdAt": "2024-01-01T00:00:00Z" }],
            "habitProgress": {
                "ghost": { "habitId": "ghost", "completedDates": [], "currentStreak": 0,
                           "longestStreak": 0, "completedToday": false }
            }
        });
        store.import_snapshot(doc).unwrap();
        assert!(store.progress("ghost").is_none());
        assert_eq!(store.progress("x").unwrap().current_streak, 0);
    }
}
