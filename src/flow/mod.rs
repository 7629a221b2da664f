//! Setup/workout flow core.
//!
//! This module encapsulates the state machine behind the single screen:
//! - `selection`: the to-lock and to-unlock sets
//! - `goal`: bounded goal, rep progress and expiring feedback
//! - `controller`: step transitions and completion detection
//! - `recorder`: streak/history persistence on completion

mod controller;
mod goal;
mod recorder;
mod selection;

pub use controller::{CompletedWorkout, FlowController, RepOutcome};
pub use goal::Goal;
pub use recorder::SessionRecorder;
pub use selection::SelectionSet;
