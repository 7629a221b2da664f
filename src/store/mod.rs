//! Key-value persistence for the streak counter and workout history.
//!
//! - `sqlite`: durable store backed by a single `kv` table
//! - `memory`: in-process store used by tests
//!
//! Values are stored as strings: the streak as a decimal integer and the
//! history as a JSON array. Writes always carry the full value.

#[cfg(test)]
mod memory;
mod sqlite;

use std::future::Future;

#[cfg(test)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::models::HistoryRecord;

/// Key holding the streak counter
pub const STREAK_KEY: &str = "streak";

/// Key holding the workout history array
pub const HISTORY_KEY: &str = "workoutHistory";

/// Async string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Write several keys. Implementations that can should apply all or none.
    fn set_many(
        &self,
        entries: Vec<(String, String)>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Decode a stored streak. Missing means zero.
pub fn decode_streak(raw: Option<&str>) -> Result<u32, StoreError> {
    match raw {
        None => Ok(0),
        Some(value) => value.trim().parse().map_err(|e: std::num::ParseIntError| {
            StoreError::Corrupt {
                key: STREAK_KEY.to_string(),
                details: format!("{:?}: {}", value, e),
            }
        }),
    }
}

/// Decode stored history. Missing means empty.
pub fn decode_history(raw: Option<&str>) -> Result<Vec<HistoryRecord>, StoreError> {
    match raw {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_str(value).map_err(|e| StoreError::Corrupt {
            key: HISTORY_KEY.to_string(),
            details: e.to_string(),
        }),
    }
}

pub fn encode_history(history: &[HistoryRecord]) -> Result<String, StoreError> {
    serde_json::to_string(history).map_err(|source| StoreError::Encode {
        key: HISTORY_KEY.to_string(),
        source,
    })
}
