//! Enums used throughout FitLock
//!
//! This module contains the various enum types used for state management
//! and UI rendering.

/// Step of the setup -> workout -> success flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Lock,    // Pick apps to restrict
    Unlock,  // Pick reward apps
    Goal,    // Pick the pushup target
    Workout, // Counting reps, camera engaged
    Success, // Goal reached, session recorded
}

impl FlowState {
    pub fn title(&self) -> &'static str {
        match self {
            FlowState::Lock => "Step 1: Apps to Lock",
            FlowState::Unlock => "Step 2: Your Rewards",
            FlowState::Goal => "Step 3: Set Your Goal",
            FlowState::Workout => "Workout",
            FlowState::Success => "Workout Complete!",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            FlowState::Lock => "Choose apps to restrict",
            FlowState::Unlock => "Unlock after workout",
            FlowState::Goal => "How many pushups?",
            FlowState::Workout => "Do your reps",
            FlowState::Success => "Rewards unlocked",
        }
    }

    /// Setup step number (1-3), None outside of setup
    pub fn step_number(&self) -> Option<u8> {
        match self {
            FlowState::Lock => Some(1),
            FlowState::Unlock => Some(2),
            FlowState::Goal => Some(3),
            FlowState::Workout | FlowState::Success => None,
        }
    }
}

/// Which of the two independent selection sets an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    ToLock,
    ToUnlock,
}

impl SelectionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SelectionKind::ToLock => "Locking",
            SelectionKind::ToUnlock => "Unlocking",
        }
    }
}

/// Outcome of the one-shot camera capability check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    #[default]
    Pending,
    Granted,
    Denied,
}
