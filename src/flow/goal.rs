//! Pushup goal, rep progress and transient rep feedback.
//!
//! The goal is a bounded step value (10..=100 in steps of 5). Progress only
//! moves forward through [`GoalTracker::record_rep`], which refuses to count
//! past the goal.

use std::time::{Duration, Instant};

/// Default lifetime of a feedback message
pub const DEFAULT_FEEDBACK_TTL: Duration = Duration::from_secs(2);

/// Pushup target, always a multiple of [`Goal::STEP`] within bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Goal(u32);

impl Goal {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 100;
    pub const STEP: u32 = 5;
    pub const DEFAULT: u32 = 20;

    /// Snap an arbitrary value onto the valid grid: clamp, then round down
    /// to a multiple of the step.
    #[cfg(test)]
    pub fn clamped(value: u32) -> Self {
        let bounded = value.clamp(Self::MIN, Self::MAX);
        Self(bounded - bounded % Self::STEP)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn increase(&mut self) {
        self.0 = (self.0 + Self::STEP).min(Self::MAX);
    }

    pub fn decrease(&mut self) {
        self.0 = self.0.saturating_sub(Self::STEP).max(Self::MIN);
    }

    /// Position within the range as 0.0..=1.0 (for the goal slider)
    pub fn ratio(&self) -> f64 {
        f64::from(self.0 - Self::MIN) / f64::from(Self::MAX - Self::MIN)
    }
}

impl Default for Goal {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Auto-expiring feedback message.
///
/// Scheduling a new message replaces the pending one and pushes the deadline
/// out, so only the latest message's expiry is ever live.
#[derive(Debug, Clone)]
pub struct FeedbackTimer {
    ttl: Duration,
    message: Option<String>,
    deadline: Option<Instant>,
}

impl FeedbackTimer {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            message: None,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, message: impl Into<String>, now: Instant) {
        self.message = Some(message.into());
        self.deadline = Some(now + self.ttl);
    }

    /// Clear the message if its deadline has passed. Returns true if cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.message = None;
        self.deadline = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Default for FeedbackTimer {
    fn default() -> Self {
        Self::new(DEFAULT_FEEDBACK_TTL)
    }
}

/// Goal, progress and feedback for one session
#[derive(Debug, Clone, Default)]
pub struct GoalTracker {
    goal: Goal,
    progress: u32,
    feedback: FeedbackTimer,
}

impl GoalTracker {
    pub fn new(feedback_ttl: Duration) -> Self {
        Self {
            goal: Goal::default(),
            progress: 0,
            feedback: FeedbackTimer::new(feedback_ttl),
        }
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.message()
    }

    pub fn increase(&mut self) {
        self.goal.increase();
    }

    pub fn decrease(&mut self) {
        self.goal.decrease();
    }

    pub fn is_reached(&self) -> bool {
        self.progress >= self.goal.value()
    }

    /// Count one rep unless the goal is already met. Returns true if counted.
    pub fn record_rep(&mut self, now: Instant, message: &str) -> bool {
        if self.is_reached() {
            return false;
        }
        self.progress += 1;
        self.feedback.schedule(message, now);
        true
    }

    /// Show a message without counting a rep
    pub fn cue(&mut self, now: Instant, message: &str) {
        self.feedback.schedule(message, now);
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.feedback.tick(now)
    }

    /// Progress as 0.0..=1.0 of the goal
    pub fn ratio(&self) -> f64 {
        (f64::from(self.progress) / f64::from(self.goal.value())).min(1.0)
    }

    pub fn reset_progress(&mut self) {
        self.progress = 0;
        self.feedback.cancel();
    }

    pub fn reset(&mut self) {
        self.goal = Goal::default();
        self.reset_progress();
    }
}
