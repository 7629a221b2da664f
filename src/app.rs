//! Application state and core logic for FitLock.
//!
//! This module contains the `App` struct which owns everything the single
//! screen needs: the flow controller, catalog, permission status, capture
//! pipeline, persisted streak/history and view state. All mutation happens
//! here, driven one event at a time by the main loop.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::capture::{CaptureEvent, CaptureService};
use crate::error::TransitionError;
use crate::flow::{CompletedWorkout, FlowController, RepOutcome, SessionRecorder};
use crate::models::{Catalog, FlowState, HistoryRecord, PermissionStatus};
use crate::signals::{Signal, SignalSink};
use crate::store::KeyValueStore;

/// Cards per row in the app grid
pub const GRID_COLUMNS: usize = 4;

/// Animation frame length for pulsing indicators
const ANIMATION_INTERVAL: Duration = Duration::from_millis(150);

/// Modal notice shown over the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
        }
    }
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Application state
pub struct App<S: KeyValueStore> {
    pub flow: FlowController,
    pub catalog: Catalog,
    pub catalog_path: Option<PathBuf>,
    pub catalog_needs_reload: Arc<Mutex<bool>>,
    pub permission: PermissionStatus,
    pub recorder: SessionRecorder<S>,
    pub capture: CaptureService,
    signals: Box<dyn SignalSink>,
    // Persisted values as last read or written
    pub streak: u32,
    pub history: Vec<HistoryRecord>,
    // Grid cursor in the lock/unlock steps
    pub cursor: usize,
    pub alert: Option<Alert>,
    // Completed workout whose save failed, kept for a retry
    pub unsaved: Option<CompletedWorkout>,
    pub workout_start: Option<Instant>,
    pub workout_elapsed: Option<Duration>,
    pub animation_tick: u64,
    pub last_animation_update: Instant,
    pub should_quit: bool,
    today: fn() -> NaiveDate,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(
        flow: FlowController,
        catalog: Catalog,
        recorder: SessionRecorder<S>,
        capture: CaptureService,
        signals: Box<dyn SignalSink>,
    ) -> Self {
        Self {
            flow,
            catalog,
            catalog_path: None,
            catalog_needs_reload: Arc::new(Mutex::new(false)),
            permission: PermissionStatus::Pending,
            recorder,
            capture,
            signals,
            streak: 0,
            history: Vec::new(),
            cursor: 0,
            alert: None,
            unsaved: None,
            workout_start: None,
            workout_elapsed: None,
            animation_tick: 0,
            last_animation_update: Instant::now(),
            should_quit: false,
            today: utc_today,
        }
    }

    /// Override the calendar used for history dates
    #[cfg(test)]
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_catalog_path(mut self, path: PathBuf) -> Self {
        self.catalog_path = Some(path);
        self
    }

    /// Read the streak and history. Missing keys are zero/empty; anything
    /// unreadable is reported and the defaults are shown.
    pub async fn load_persisted(&mut self) {
        match self.recorder.load_streak().await {
            Ok(streak) => self.streak = streak,
            Err(e) => {
                warn!(error = %e, "could not load streak");
                self.alert = Some(Alert::new("Saved data unreadable", e.to_string()));
            }
        }
        match self.recorder.load_history().await {
            Ok(history) => self.history = history,
            Err(e) => {
                warn!(error = %e, "could not load workout history");
                self.alert = Some(Alert::new("Saved data unreadable", e.to_string()));
            }
        }
        info!(streak = self.streak, workouts = self.history.len(), "persisted state loaded");
    }

    pub fn set_permission(&mut self, permission: PermissionStatus) {
        self.permission = permission;
    }

    pub async fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('q')
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.alert = None;
            }
            return;
        }

        // Everything waits on the permission check
        if self.permission == PermissionStatus::Pending {
            return;
        }

        match self.flow.state() {
            FlowState::Lock | FlowState::Unlock => self.handle_selection_key(key.code),
            FlowState::Goal => self.handle_goal_key(key.code),
            FlowState::Workout => match key.code {
                KeyCode::Char(' ') | KeyCode::Char('p') => {
                    self.capture.press_manual();
                }
                KeyCode::Char('r') | KeyCode::Esc => self.reset(),
                _ => {}
            },
            FlowState::Success => match key.code {
                KeyCode::Enter | KeyCode::Char('n') => self.reset(),
                KeyCode::Char('s') => self.retry_save().await,
                _ => {}
            },
        }

        self.process_capture(now).await;
    }

    fn handle_selection_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_at_cursor(),
            KeyCode::Char('n') | KeyCode::Tab => {
                // Disabled rather than rejected when the set is empty
                if self.flow.can_advance() && self.flow.advance().is_ok() {
                    self.cursor = 0;
                }
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                if self.flow.back().is_ok() {
                    self.cursor = 0;
                }
            }
            _ => {}
        }
    }

    fn handle_goal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right | KeyCode::Up => {
                self.flow.increase_goal();
            }
            KeyCode::Char('-') | KeyCode::Left | KeyCode::Down => {
                self.flow.decrease_goal();
            }
            KeyCode::Enter | KeyCode::Char('s') => self.start_workout(),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                let _ = self.flow.back();
            }
            _ => {}
        }
    }

    /// Move the grid cursor, clamped to the catalog
    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let target = self.cursor as isize + dx + dy * GRID_COLUMNS as isize;
        if (0..len as isize).contains(&target) {
            self.cursor = target as usize;
        }
    }

    fn toggle_at_cursor(&mut self) {
        let Some(id) = self.catalog.at(self.cursor).map(|item| item.id.clone()) else {
            return;
        };
        self.flow.toggle(&id);
    }

    pub fn start_workout(&mut self) {
        match self.flow.start_workout(self.permission) {
            Ok(()) => {
                self.workout_start = Some(Instant::now());
                self.workout_elapsed = None;
                self.sync_capture();
            }
            Err(TransitionError::CameraDenied) => {
                self.alert = Some(Alert::new(
                    "Camera Permission",
                    TransitionError::CameraDenied.to_string(),
                ));
            }
            Err(e) => debug!(error = %e, "start workout refused"),
        }
    }

    /// Bring the capture pipeline in line with the flow's capture flag
    fn sync_capture(&mut self) {
        if self.flow.capture_active() && !self.capture.is_active() {
            if let Err(e) = self.capture.start() {
                self.flow
                    .cue(Instant::now(), "Detector unavailable, use the manual trigger");
                warn!(error = %e, "capture started without detector");
            }
        } else if !self.flow.capture_active() && self.capture.is_active() {
            self.capture.stop();
        }
    }

    /// Apply queued capture events in arrival order
    pub async fn process_capture(&mut self, now: Instant) {
        for event in self.capture.drain() {
            match event {
                CaptureEvent::Rep(source) => {
                    if let RepOutcome::Counted { progress } =
                        self.flow.record_rep(now, source.feedback())
                    {
                        debug!(progress, ?source, "rep counted");
                        self.signals.emit(Signal::RepPulse);
                    }
                    self.check_completion(now).await;
                }
                CaptureEvent::Cue(message) => self.flow.cue(now, &message),
            }
        }
    }

    async fn check_completion(&mut self, now: Instant) {
        let Some(workout) = self.flow.check_completion((self.today)()) else {
            return;
        };
        self.sync_capture();
        self.workout_elapsed = self.workout_start.map(|start| now.saturating_duration_since(start));
        self.signals.emit(Signal::WorkoutComplete);
        self.save(workout).await;
    }

    async fn save(&mut self, workout: CompletedWorkout) {
        match self.recorder.record(&workout).await {
            Ok(recorded) => {
                self.streak = recorded.streak;
                self.history = recorded.history;
                self.unsaved = None;
            }
            Err(e) => {
                self.alert = Some(Alert::new(
                    "Workout not saved",
                    format!("{}. Press s to retry.", e),
                ));
                self.unsaved = Some(workout);
            }
        }
    }

    /// Retry persisting a workout whose save failed
    pub async fn retry_save(&mut self) {
        if let Some(workout) = self.unsaved.take() {
            info!("retrying workout save");
            self.save(workout).await;
        }
    }

    /// Back to step one with everything cleared
    pub fn reset(&mut self) {
        if self.unsaved.take().is_some() {
            warn!("discarding unsaved workout on reset");
        }
        self.flow.reset();
        self.sync_capture();
        self.cursor = 0;
        self.workout_start = None;
        self.workout_elapsed = None;
    }

    /// Time spent in the current (or just finished) workout
    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.workout_elapsed, self.workout_start) {
            (Some(frozen), _) => frozen,
            (None, Some(start)) => now.saturating_duration_since(start),
            (None, None) => Duration::ZERO,
        }
    }

    /// Periodic work between input events
    pub async fn tick(&mut self, now: Instant) {
        self.process_capture(now).await;
        self.flow.tick(now);
        if now.saturating_duration_since(self.last_animation_update) >= ANIMATION_INTERVAL {
            self.animation_tick = self.animation_tick.wrapping_add(1);
            self.last_animation_update = now;
        }
        self.reload_catalog_if_needed();
    }

    /// Reload the catalog from disk if flagged
    pub fn reload_catalog_if_needed(&mut self) {
        let needs_reload = {
            let Ok(mut flag) = self.catalog_needs_reload.lock() else {
                return;
            };
            std::mem::replace(&mut *flag, false)
        };
        if !needs_reload {
            return;
        }
        let Some(path) = self.catalog_path.as_ref() else {
            return;
        };
        match Catalog::load(path) {
            Ok(catalog) => {
                info!(items = catalog.len(), "catalog reloaded");
                self.catalog = catalog;
                self.cursor = self.cursor.min(self.catalog.len().saturating_sub(1));
            }
            Err(e) => warn!(error = %e, "keeping previous catalog"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectionKind;
    use crate::signals::RecordingSignals;
    use crate::store::MemoryStore;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn test_app(store: MemoryStore) -> (App<MemoryStore>, RecordingSignals) {
        let signals = RecordingSignals::default();
        let mut app = App::new(
            FlowController::default(),
            Catalog::default(),
            SessionRecorder::new(store),
            CaptureService::new(None),
            Box::new(signals.clone()),
        )
        .with_today(fixed_today);
        app.set_permission(PermissionStatus::Granted);
        (app, signals)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn press(app: &mut App<MemoryStore>, code: KeyCode) {
        app.handle_key(key(code), Instant::now()).await;
    }

    /// Move the cursor onto `id` and toggle it
    async fn pick(app: &mut App<MemoryStore>, id: &str) {
        let index = app
            .catalog
            .items()
            .iter()
            .position(|item| item.id == id)
            .unwrap();
        app.cursor = index;
        press(app, KeyCode::Char(' ')).await;
    }

    /// Lock instagram, unlock tiktok + youtube, goal 30, start workout
    async fn app_in_workout(store: MemoryStore) -> (App<MemoryStore>, RecordingSignals) {
        let (mut app, signals) = test_app(store);
        pick(&mut app, "instagram").await;
        press(&mut app, KeyCode::Char('n')).await;
        pick(&mut app, "tiktok").await;
        pick(&mut app, "youtube").await;
        press(&mut app, KeyCode::Char('n')).await;
        for _ in 0..2 {
            press(&mut app, KeyCode::Char('+')).await;
        }
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.flow.state(), FlowState::Workout);
        (app, signals)
    }

    #[tokio::test]
    async fn test_full_session_records_streak_and_history() {
        let store = MemoryStore::new();
        let (mut app, signals) = app_in_workout(store.clone()).await;
        assert!(app.capture.is_active());

        for _ in 0..30 {
            press(&mut app, KeyCode::Char(' ')).await;
        }

        assert_eq!(app.flow.state(), FlowState::Success);
        assert!(!app.capture.is_active());
        assert_eq!(app.streak, 1);
        assert_eq!(
            app.history.last(),
            Some(&HistoryRecord {
                date: "2026-10-17".to_string(),
                reps: 30,
                apps_unlocked: vec!["tiktok".to_string(), "youtube".to_string()],
            })
        );
        let signals = signals.signals();
        assert_eq!(signals.iter().filter(|s| **s == Signal::RepPulse).count(), 30);
        assert_eq!(signals.last(), Some(&Signal::WorkoutComplete));

        // Persisted, not just in memory
        let reloaded = SessionRecorder::new(store);
        assert_eq!(reloaded.load_streak().await.unwrap(), 1);
        assert_eq!(reloaded.load_history().await.unwrap(), app.history);
    }

    #[tokio::test]
    async fn test_extra_reps_do_not_double_count() {
        let (mut app, _) = app_in_workout(MemoryStore::new()).await;
        for _ in 0..31 {
            press(&mut app, KeyCode::Char(' ')).await;
            app.tick(Instant::now()).await;
        }
        assert_eq!(app.flow.progress(), 30);
        assert_eq!(app.streak, 1);
        assert_eq!(app.history.len(), 1);
    }

    #[tokio::test]
    async fn test_advance_disabled_with_empty_selection() {
        let (mut app, _) = test_app(MemoryStore::new());
        press(&mut app, KeyCode::Char('n')).await;
        assert_eq!(app.flow.state(), FlowState::Lock);
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn test_denied_camera_shows_alert() {
        let (mut app, _) = test_app(MemoryStore::new());
        app.set_permission(PermissionStatus::Denied);
        pick(&mut app, "reddit").await;
        press(&mut app, KeyCode::Char('n')).await;
        pick(&mut app, "netflix").await;
        press(&mut app, KeyCode::Char('n')).await;
        press(&mut app, KeyCode::Enter).await;

        assert_eq!(app.flow.state(), FlowState::Goal);
        assert!(!app.capture.is_active());
        let alert = app.alert.clone().unwrap();
        assert_eq!(alert.title, "Camera Permission");

        // Any dismiss key clears the alert without acting
        press(&mut app, KeyCode::Esc).await;
        assert!(app.alert.is_none());
        assert_eq!(app.flow.state(), FlowState::Goal);
    }

    #[tokio::test]
    async fn test_pending_permission_disables_actions() {
        let (mut app, _) = test_app(MemoryStore::new());
        app.set_permission(PermissionStatus::Pending);
        press(&mut app, KeyCode::Char(' ')).await;
        assert!(app.flow.selection(SelectionKind::ToLock).is_empty());
        press(&mut app, KeyCode::Char('q')).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_reset_mid_workout_releases_capture() {
        let (mut app, _) = app_in_workout(MemoryStore::new()).await;
        press(&mut app, KeyCode::Char(' ')).await;
        press(&mut app, KeyCode::Char('r')).await;

        assert_eq!(app.flow.state(), FlowState::Lock);
        assert!(!app.capture.is_active());
        assert_eq!(app.flow.progress(), 0);
        assert!(app.flow.selection(SelectionKind::ToLock).is_empty());
        assert!(app.flow.selection(SelectionKind::ToUnlock).is_empty());
        assert_eq!(app.streak, 0);
    }

    #[tokio::test]
    async fn test_failed_save_is_surfaced_and_retryable() {
        let store = MemoryStore::new();
        let (mut app, _) = app_in_workout(store.clone()).await;
        store.fail_writes(true);
        for _ in 0..30 {
            press(&mut app, KeyCode::Char(' ')).await;
        }

        assert_eq!(app.flow.state(), FlowState::Success);
        assert_eq!(app.streak, 0);
        assert!(app.history.is_empty());
        assert!(app.unsaved.is_some());
        assert_eq!(app.alert.as_ref().unwrap().title, "Workout not saved");

        press(&mut app, KeyCode::Enter).await; // dismiss
        store.fail_writes(false);
        press(&mut app, KeyCode::Char('s')).await;
        assert_eq!(app.streak, 1);
        assert_eq!(app.history.len(), 1);
        assert!(app.unsaved.is_none());

        // A second retry has nothing left to save
        press(&mut app, KeyCode::Char('s')).await;
        assert_eq!(app.streak, 1);
    }

    #[tokio::test]
    async fn test_new_session_from_success() {
        let (mut app, _) = app_in_workout(MemoryStore::new()).await;
        for _ in 0..30 {
            press(&mut app, KeyCode::Char(' ')).await;
        }
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.flow.state(), FlowState::Lock);
        assert_eq!(app.flow.goal().value(), 20);
        assert_eq!(app.streak, 1);
    }

    #[tokio::test]
    async fn test_load_persisted_defaults_and_values() {
        let store = MemoryStore::new();
        let (mut app, _) = test_app(store.clone());
        app.load_persisted().await;
        assert_eq!(app.streak, 0);
        assert!(app.history.is_empty());

        store.set("streak", "7".to_string()).await.unwrap();
        app.load_persisted().await;
        assert_eq!(app.streak, 7);
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn test_load_persisted_corrupt_streak_alerts() {
        let store = MemoryStore::new();
        store.set("streak", "NaN".to_string()).await.unwrap();
        let (mut app, _) = test_app(store);
        app.load_persisted().await;
        assert_eq!(app.streak, 0);
        assert!(app.alert.is_some());
    }

    #[test]
    fn test_cursor_moves_within_grid() {
        let (mut app, _) = test_app(MemoryStore::new());
        app.move_cursor(-1, 0);
        assert_eq!(app.cursor, 0);
        app.move_cursor(0, 1);
        assert_eq!(app.cursor, GRID_COLUMNS);
        app.move_cursor(0, 1);
        assert_eq!(app.cursor, GRID_COLUMNS);
        app.move_cursor(3, 0);
        assert_eq!(app.cursor, 7);
        app.move_cursor(1, 0);
        assert_eq!(app.cursor, 7);
    }

    #[test]
    fn test_catalog_reload_on_flag() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"[{"id":"chess","name":"Chess","icon":"C","packageName":"com.chess"}]"#,
        )
        .unwrap();
        let (app, _) = test_app(MemoryStore::new());
        let mut app = app.with_catalog_path(file.path().to_path_buf());
        app.cursor = 5;

        app.reload_catalog_if_needed();
        assert_eq!(app.catalog.len(), 8);

        *app.catalog_needs_reload.lock().unwrap() = true;
        app.reload_catalog_if_needed();
        assert_eq!(app.catalog.len(), 1);
        assert_eq!(app.cursor, 0);
        assert!(!*app.catalog_needs_reload.lock().unwrap());
    }
}
