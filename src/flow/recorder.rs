//! Session recorder: persists the streak and history for a completed workout.

use tracing::{info, warn};

use super::controller::CompletedWorkout;
use crate::error::StoreError;
use crate::models::HistoryRecord;
use crate::store::{
    decode_history, decode_streak, encode_history, KeyValueStore, HISTORY_KEY, STREAK_KEY,
};

/// What was written for a completed workout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub streak: u32,
    pub history: Vec<HistoryRecord>,
}

pub struct SessionRecorder<S> {
    store: S,
}

impl<S: KeyValueStore> SessionRecorder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn load_streak(&self) -> Result<u32, StoreError> {
        let raw = self.store.get(STREAK_KEY).await?;
        decode_streak(raw.as_deref())
    }

    pub async fn load_history(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        let raw = self.store.get(HISTORY_KEY).await?;
        decode_history(raw.as_deref())
    }

    /// Increment the streak and append a history entry.
    ///
    /// Both values are read fresh, updated, and written back together, so a
    /// failure at any point leaves the stored streak and history as they were.
    pub async fn record(&self, workout: &CompletedWorkout) -> Result<Recorded, StoreError> {
        let streak = self.load_streak().await?.saturating_add(1);
        let mut history = self.load_history().await?;
        history.push(HistoryRecord::new(
            workout.date,
            workout.reps,
            workout.apps_unlocked.clone(),
        ));

        let entries = vec![
            (STREAK_KEY.to_string(), streak.to_string()),
            (HISTORY_KEY.to_string(), encode_history(&history)?),
        ];
        if let Err(e) = self.store.set_many(entries).await {
            warn!(error = %e, "failed to persist workout");
            return Err(e);
        }

        info!(streak, entries = history.len(), "workout recorded");
        Ok(Recorded { streak, history })
    }
}
