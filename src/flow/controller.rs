//! Flow controller: the lock -> unlock -> goal -> workout -> success machine.
//!
//! ```text
//! Lock --advance--> Unlock --advance--> Goal --start--> Workout --goal met--> Success
//!  ^                  |  ^                |                |                   |
//!  +------back--------+  +-----back-------+                |                   |
//!  +-------------------------------reset-------------------+-------------------+
//! ```
//!
//! Guards that fail leave the state untouched and report a [`TransitionError`].
//! The controller only owns in-memory state; persistence happens in
//! [`super::SessionRecorder`] with the [`CompletedWorkout`] this hands out.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info};

use super::goal::{Goal, GoalTracker};
use super::selection::SelectionSet;
use crate::error::TransitionError;
use crate::models::{FlowState, PermissionStatus, SelectionKind};

/// Snapshot taken at the moment the goal is met
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedWorkout {
    pub date: NaiveDate,
    pub reps: u32,
    pub apps_unlocked: Vec<String>,
}

/// Result of feeding one rep into the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepOutcome {
    /// Not in a workout, or the goal is already met
    Ignored,
    Counted { progress: u32 },
}

#[derive(Debug, Clone)]
pub struct FlowController {
    state: FlowState,
    to_lock: SelectionSet,
    to_unlock: SelectionSet,
    tracker: GoalTracker,
    capture_active: bool,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new(super::goal::DEFAULT_FEEDBACK_TTL)
    }
}

impl FlowController {
    pub fn new(feedback_ttl: Duration) -> Self {
        Self {
            state: FlowState::Lock,
            to_lock: SelectionSet::new(),
            to_unlock: SelectionSet::new(),
            tracker: GoalTracker::new(feedback_ttl),
            capture_active: false,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn selection(&self, kind: SelectionKind) -> &SelectionSet {
        match kind {
            SelectionKind::ToLock => &self.to_lock,
            SelectionKind::ToUnlock => &self.to_unlock,
        }
    }

    pub fn goal(&self) -> Goal {
        self.tracker.goal()
    }

    pub fn progress(&self) -> u32 {
        self.tracker.progress()
    }

    pub fn progress_ratio(&self) -> f64 {
        self.tracker.ratio()
    }

    pub fn feedback(&self) -> Option<&str> {
        self.tracker.feedback()
    }

    pub fn capture_active(&self) -> bool {
        self.capture_active
    }

    /// The selection set edited in the current step, if any
    pub fn active_selection(&self) -> Option<SelectionKind> {
        match self.state {
            FlowState::Lock => Some(SelectionKind::ToLock),
            FlowState::Unlock => Some(SelectionKind::ToUnlock),
            _ => None,
        }
    }

    /// Whether the forward action of the current setup step is enabled
    pub fn can_advance(&self) -> bool {
        match self.state {
            FlowState::Lock => !self.to_lock.is_empty(),
            FlowState::Unlock => !self.to_unlock.is_empty(),
            _ => false,
        }
    }

    /// Toggle `id` in the set belonging to the current step.
    ///
    /// Returns the new membership, or None when the step has no selection.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let kind = self.active_selection()?;
        let member = match kind {
            SelectionKind::ToLock => self.to_lock.toggle(id),
            SelectionKind::ToUnlock => self.to_unlock.toggle(id),
        };
        debug!(?kind, id, member, "selection toggled");
        Some(member)
    }

    pub fn advance(&mut self) -> Result<FlowState, TransitionError> {
        let next = match self.state {
            FlowState::Lock => FlowState::Unlock,
            FlowState::Unlock => FlowState::Goal,
            from => {
                return Err(TransitionError::NotAllowed {
                    from,
                    action: "advance",
                });
            }
        };
        if !self.can_advance() {
            return Err(TransitionError::EmptySelection);
        }
        self.enter(next);
        Ok(next)
    }

    pub fn back(&mut self) -> Result<FlowState, TransitionError> {
        let previous = match self.state {
            FlowState::Unlock => FlowState::Lock,
            FlowState::Goal => FlowState::Unlock,
            from => return Err(TransitionError::NotAllowed { from, action: "back" }),
        };
        self.enter(previous);
        Ok(previous)
    }

    pub fn increase_goal(&mut self) -> bool {
        if self.state != FlowState::Goal {
            return false;
        }
        self.tracker.increase();
        true
    }

    pub fn decrease_goal(&mut self) -> bool {
        if self.state != FlowState::Goal {
            return false;
        }
        self.tracker.decrease();
        true
    }

    /// Enter the workout: resets progress and asks for capture.
    pub fn start_workout(&mut self, permission: PermissionStatus) -> Result<(), TransitionError> {
        if self.state != FlowState::Goal {
            return Err(TransitionError::NotAllowed {
                from: self.state,
                action: "start workout",
            });
        }
        match permission {
            PermissionStatus::Granted => {}
            PermissionStatus::Denied => return Err(TransitionError::CameraDenied),
            PermissionStatus::Pending => return Err(TransitionError::CameraPending),
        }
        self.tracker.reset_progress();
        self.capture_active = true;
        self.enter(FlowState::Workout);
        info!(goal = self.goal().value(), "workout started");
        Ok(())
    }

    /// Count one rep while in the workout.
    pub fn record_rep(&mut self, now: Instant, message: &str) -> RepOutcome {
        if self.state != FlowState::Workout {
            return RepOutcome::Ignored;
        }
        if self.tracker.record_rep(now, message) {
            RepOutcome::Counted {
                progress: self.tracker.progress(),
            }
        } else {
            RepOutcome::Ignored
        }
    }

    /// Show form feedback without counting (only meaningful in a workout)
    pub fn cue(&mut self, now: Instant, message: &str) {
        if self.state == FlowState::Workout {
            self.tracker.cue(now, message);
        }
    }

    /// Move to success if the goal is met.
    ///
    /// The `Workout -> Success` transition is the edge: once it has happened
    /// every further call returns None, so the snapshot is handed out at most
    /// once per workout no matter how often this is polled.
    pub fn check_completion(&mut self, today: NaiveDate) -> Option<CompletedWorkout> {
        if self.state != FlowState::Workout || !self.tracker.is_reached() {
            return None;
        }
        self.capture_active = false;
        self.enter(FlowState::Success);
        let workout = CompletedWorkout {
            date: today,
            reps: self.goal().value(),
            apps_unlocked: self.to_unlock.snapshot(),
        };
        info!(reps = workout.reps, apps = ?workout.apps_unlocked, "workout complete");
        Some(workout)
    }

    /// Return to the first step with everything cleared. Legal from any state.
    pub fn reset(&mut self) {
        self.to_lock.clear();
        self.to_unlock.clear();
        self.tracker.reset();
        self.capture_active = false;
        self.enter(FlowState::Lock);
    }

    /// Expire stale feedback. Returns true if something changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.tracker.tick(now)
    }

    fn enter(&mut self, next: FlowState) {
        debug!(from = ?self.state, to = ?next, "flow transition");
        self.state = next;
    }
}
