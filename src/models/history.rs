//! Workout history records
//!
//! History is stored as a JSON array under the `workoutHistory` key, one
//! entry per completed workout, append-only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for history entries (ISO calendar day)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One completed workout as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub date: String,
    pub reps: u32,
    pub apps_unlocked: Vec<String>,
}

impl HistoryRecord {
    pub fn new(date: NaiveDate, reps: u32, apps_unlocked: Vec<String>) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            reps,
            apps_unlocked,
        }
    }
}

/// Total reps across all history entries
pub fn total_reps(history: &[HistoryRecord]) -> u64 {
    history.iter().map(|r| u64::from(r.reps)).sum()
}
