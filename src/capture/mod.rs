//! Camera capability and rep capture.
//!
//! This module encapsulates everything that stands between the flow core
//! and the camera:
//! - `camera`: the one-shot startup permission check
//! - `manual`: key-press rep trigger
//! - `pose`: landmark-based pushup detector and a replay source feeding it
//!
//! Both rep producers implement [`RepSource`] and push [`CaptureEvent`]s into
//! one channel owned by [`CaptureService`]; the app only ever drains that
//! channel and never talks to a producer directly.

mod camera;
mod manual;
mod pose;

pub use camera::{request_permission, CameraPolicy, DEFAULT_CAMERA_DEVICE};
pub use manual::ManualTrigger;
pub use pose::PoseReplay;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::error::CaptureError;

/// Which producer saw the rep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepSourceKind {
    Manual,
    Detector,
}

impl RepSourceKind {
    /// Feedback shown for a counted rep
    pub fn feedback(&self) -> &'static str {
        match self {
            RepSourceKind::Manual => "Great rep! Keep going! 💪",
            RepSourceKind::Detector => "✓ Perfect rep!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Rep(RepSourceKind),
    /// Form feedback that does not count as a rep
    Cue(String),
}

/// A producer of rep events
pub trait RepSource: Send {
    fn name(&self) -> &'static str;

    fn start(&mut self, events: UnboundedSender<CaptureEvent>) -> Result<(), CaptureError>;

    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// Owns the rep producers and the channel they feed.
pub struct CaptureService {
    manual: ManualTrigger,
    detector: Option<Box<dyn RepSource>>,
    tx: UnboundedSender<CaptureEvent>,
    rx: UnboundedReceiver<CaptureEvent>,
    active: bool,
}

impl CaptureService {
    pub fn new(detector: Option<Box<dyn RepSource>>) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            manual: ManualTrigger::new(),
            detector,
            tx,
            rx,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn detector_name(&self) -> Option<&'static str> {
        self.detector.as_ref().map(|d| d.name())
    }

    /// Engage the camera pipeline.
    ///
    /// The manual trigger always starts; a detector that fails to start is
    /// logged and the workout continues on manual input alone.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.active {
            return Ok(());
        }
        self.manual.start(self.tx.clone())?;
        let mut result = Ok(());
        if let Some(detector) = self.detector.as_mut() {
            if let Err(e) = detector.start(self.tx.clone()) {
                warn!(source = detector.name(), error = %e, "rep detector failed to start");
                result = Err(e);
            }
        }
        self.active = true;
        info!("capture started");
        result
    }

    /// Release the camera pipeline and drop anything still queued.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.manual.stop();
        if let Some(detector) = self.detector.as_mut() {
            detector.stop();
        }
        let stale = self.drain().len();
        self.active = false;
        info!(stale, "capture stopped");
    }

    pub fn press_manual(&self) -> bool {
        self.manual.press()
    }

    /// Take every queued event without waiting
    pub fn drain(&mut self) -> Vec<CaptureEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Drop for CaptureService {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Detector double that records start/stop calls and can emit on demand
    struct FakeDetector {
        starts: Arc<AtomicUsize>,
        stops: Arc<AtomicUsize>,
        events: Option<UnboundedSender<CaptureEvent>>,
        fail: bool,
    }

    impl RepSource for FakeDetector {
        fn name(&self) -> &'static str {
            "fake detector"
        }

        fn start(&mut self, events: UnboundedSender<CaptureEvent>) -> Result<(), CaptureError> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CaptureError::NoRuntime("fake detector"));
            }
            events.send(CaptureEvent::Rep(RepSourceKind::Detector)).unwrap();
            self.events = Some(events);
            Ok(())
        }

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
            self.events = None;
        }

        fn is_running(&self) -> bool {
            self.events.is_some()
        }
    }

    fn fake(fail: bool) -> (Box<dyn RepSource>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let starts = Arc::new(AtomicUsize::new(0));
        let stops = Arc::new(AtomicUsize::new(0));
        let detector = FakeDetector {
            starts: Arc::clone(&starts),
            stops: Arc::clone(&stops),
            events: None,
            fail,
        };
        (Box::new(detector), starts, stops)
    }

    #[test]
    fn test_manual_presses_flow_through_channel() {
        let mut capture = CaptureService::new(None);
        assert!(!capture.press_manual());
        capture.start().unwrap();
        assert!(capture.press_manual());
        assert!(capture.press_manual());
        assert_eq!(
            capture.drain(),
            vec![
                CaptureEvent::Rep(RepSourceKind::Manual),
                CaptureEvent::Rep(RepSourceKind::Manual)
            ]
        );
        assert!(capture.drain().is_empty());
    }

    #[test]
    fn test_start_and_stop_reach_detector() {
        let (detector, starts, stops) = fake(false);
        let mut capture = CaptureService::new(Some(detector));
        capture.start().unwrap();
        capture.start().unwrap();
        assert!(capture.is_active());
        assert_eq!(starts.load(Ordering::SeqCst), 1);

        capture.stop();
        assert!(!capture.is_active());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        // The detector's queued rep was discarded on stop
        assert!(capture.drain().is_empty());
    }

    #[test]
    fn test_detector_failure_keeps_manual_input() {
        let (detector, _, _) = fake(true);
        let mut capture = CaptureService::new(Some(detector));
        assert!(capture.start().is_err());
        assert!(capture.is_active());
        assert!(capture.press_manual());
    }

    #[test]
    fn test_rep_feedback_messages() {
        assert!(RepSourceKind::Manual.feedback().starts_with("Great rep!"));
        assert_eq!(RepSourceKind::Detector.feedback(), "✓ Perfect rep!");
    }
}
