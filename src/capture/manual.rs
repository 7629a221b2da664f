//! Manual rep trigger (a key press stands in for a detected rep).

use tokio::sync::mpsc::UnboundedSender;

use super::{CaptureEvent, RepSource, RepSourceKind};
use crate::error::CaptureError;

#[derive(Debug, Default)]
pub struct ManualTrigger {
    events: Option<UnboundedSender<CaptureEvent>>,
}

impl ManualTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one rep. Returns false when the trigger is not running.
    pub fn press(&self) -> bool {
        match &self.events {
            Some(tx) => tx.send(CaptureEvent::Rep(RepSourceKind::Manual)).is_ok(),
            None => false,
        }
    }
}

impl RepSource for ManualTrigger {
    fn name(&self) -> &'static str {
        "manual trigger"
    }

    fn start(&mut self, events: UnboundedSender<CaptureEvent>) -> Result<(), CaptureError> {
        if self.events.is_some() {
            return Err(CaptureError::AlreadyRunning(self.name()));
        }
        self.events = Some(events);
        Ok(())
    }

    fn stop(&mut self) {
        self.events = None;
    }

    fn is_running(&self) -> bool {
        self.events.is_some()
    }
}
