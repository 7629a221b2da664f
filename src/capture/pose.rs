//! Pose-based rep detection.
//!
//! `PushupDetector` turns a stream of pose landmarks (normalized image
//! coordinates for one side of the body) into reps using the elbow angle:
//! a rep is the arms going from extended (> 160 deg) to bent (< 90 deg)
//! with the body held straight. `PoseReplay` feeds recorded landmark frames
//! from a JSON-lines file through the detector on a tokio task.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{CaptureEvent, RepSource, RepSourceKind};
use crate::error::CaptureError;

/// Elbow angle above which the arms count as extended
pub const EXTENDED_ANGLE: f64 = 160.0;

/// Elbow angle below which the arms count as bent
pub const BENT_ANGLE: f64 = 90.0;

/// Minimum shoulder-hip-ankle angle for a straight body
pub const ALIGNED_MIN_ANGLE: f64 = 160.0;

pub const MISALIGNED_CUE: &str = "Keep your body straight!";

/// 2D landmark `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point(pub f64, pub f64);

/// Landmarks needed for pushup detection
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PoseFrame {
    pub shoulder: Point,
    pub elbow: Point,
    pub wrist: Point,
    pub hip: Point,
    pub ankle: Point,
}

/// Angle at `b` formed by `a-b-c`, in degrees within 0..=180
pub fn joint_angle(a: Point, b: Point, c: Point) -> f64 {
    let radians = (c.1 - b.1).atan2(c.0 - b.0) - (a.1 - b.1).atan2(a.0 - b.0);
    let angle = radians.to_degrees().abs();
    if angle > 180.0 { 360.0 - angle } else { angle }
}

/// Plank check: shoulder, hip and ankle roughly in a line
pub fn is_aligned(frame: &PoseFrame) -> bool {
    let angle = joint_angle(frame.shoulder, frame.hip, frame.ankle);
    (ALIGNED_MIN_ANGLE..=180.0).contains(&angle)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Completed a rep with good form
    Rep,
    /// Reached the bottom with the body bent, not counted
    Misaligned,
    /// Nothing to report for this frame
    None,
}

#[derive(Debug, Clone, Default)]
pub struct PushupDetector {
    stage: Option<Stage>,
    reps: u32,
}

impl PushupDetector {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    pub fn process(&mut self, frame: &PoseFrame) -> Verdict {
        let angle = joint_angle(frame.shoulder, frame.elbow, frame.wrist);

        if angle > EXTENDED_ANGLE {
            self.stage = Some(Stage::Up);
        }

        if angle < BENT_ANGLE && self.stage == Some(Stage::Up) {
            self.stage = Some(Stage::Down);
            if is_aligned(frame) {
                self.reps += 1;
                return Verdict::Rep;
            }
            return Verdict::Misaligned;
        }

        Verdict::None
    }
}

/// Parse JSON-lines pose frames, skipping blank and malformed lines
pub fn parse_frames(content: &str) -> Vec<PoseFrame> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match serde_json::from_str(line) {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!(line = idx + 1, error = %e, "skipping malformed pose frame");
                None
            }
        })
        .collect()
}

/// Replays recorded pose frames through a [`PushupDetector`]
pub struct PoseReplay {
    path: PathBuf,
    frame_interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl PoseReplay {
    pub fn new(path: PathBuf, fps: u32) -> Self {
        let fps = fps.max(1);
        Self {
            path,
            frame_interval: Duration::from_secs(1) / fps,
            task: None,
        }
    }
}

async fn replay(path: PathBuf, frame_interval: Duration, events: UnboundedSender<CaptureEvent>) {
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read pose replay");
            return;
        }
    };
    let frames = parse_frames(&content);
    info!(frames = frames.len(), "pose replay started");

    let mut detector = PushupDetector::new();
    let mut ticker = tokio::time::interval(frame_interval);
    for frame in &frames {
        ticker.tick().await;
        let event = match detector.process(frame) {
            Verdict::Rep => CaptureEvent::Rep(RepSourceKind::Detector),
            Verdict::Misaligned => CaptureEvent::Cue(MISALIGNED_CUE.to_string()),
            Verdict::None => continue,
        };
        if events.send(event).is_err() {
            debug!("capture channel closed, ending replay");
            return;
        }
    }
    info!(reps = detector.reps(), "pose replay finished");
}

impl RepSource for PoseReplay {
    fn name(&self) -> &'static str {
        "pose replay"
    }

    fn start(&mut self, events: UnboundedSender<CaptureEvent>) -> Result<(), CaptureError> {
        if self.is_running() {
            return Err(CaptureError::AlreadyRunning(self.name()));
        }
        if !self.path.exists() {
            return Err(CaptureError::ReplayMissing(self.path.clone()));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| CaptureError::NoRuntime(self.name()))?;
        self.task = Some(runtime.spawn(replay(
            self.path.clone(),
            self.frame_interval,
            events,
        )));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for PoseReplay {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::sync::mpsc::unbounded_channel;

    const UP: PoseFrame = PoseFrame {
        shoulder: Point(0.0, 0.0),
        elbow: Point(1.0, 0.0),
        wrist: Point(2.0, 0.0),
        hip: Point(2.0, 0.0),
        ankle: Point(4.0, 0.0),
    };

    const DOWN: PoseFrame = PoseFrame {
        shoulder: Point(0.0, 0.0),
        elbow: Point(1.0, 0.0),
        wrist: Point(0.5, 1.0),
        hip: Point(2.0, 0.0),
        ankle: Point(4.0, 0.0),
    };

    const DOWN_SAGGING: PoseFrame = PoseFrame {
        ankle: Point(2.0, 2.0),
        ..DOWN
    };

    fn frame_json(frame: &PoseFrame) -> String {
        format!(
            r#"{{"shoulder":[{},{}],"elbow":[{},{}],"wrist":[{},{}],"hip":[{},{}],"ankle":[{},{}]}}"#,
            frame.shoulder.0,
            frame.shoulder.1,
            frame.elbow.0,
            frame.elbow.1,
            frame.wrist.0,
            frame.wrist.1,
            frame.hip.0,
            frame.hip.1,
            frame.ankle.0,
            frame.ankle.1
        )
    }

    #[test]
    fn test_joint_angle() {
        let straight = joint_angle(Point(0.0, 0.0), Point(1.0, 0.0), Point(2.0, 0.0));
        assert!((straight - 180.0).abs() < 1e-9);
        let right = joint_angle(Point(0.0, 0.0), Point(1.0, 0.0), Point(1.0, 1.0));
        assert!((right - 90.0).abs() < 1e-9);
        assert!(joint_angle(DOWN.shoulder, DOWN.elbow, DOWN.wrist) < BENT_ANGLE);
    }

    #[test]
    fn test_alignment() {
        assert!(is_aligned(&UP));
        assert!(!is_aligned(&DOWN_SAGGING));
    }

    #[test]
    fn test_detector_counts_full_reps_only() {
        let mut detector = PushupDetector::new();
        // Starting at the bottom does not count
        assert_eq!(detector.process(&DOWN), Verdict::None);
        assert_eq!(detector.process(&UP), Verdict::None);
        assert_eq!(detector.stage(), Some(Stage::Up));
        assert_eq!(detector.process(&DOWN), Verdict::Rep);
        // Staying down does not double count
        assert_eq!(detector.process(&DOWN), Verdict::None);
        assert_eq!(detector.process(&UP), Verdict::None);
        assert_eq!(detector.process(&DOWN), Verdict::Rep);
        assert_eq!(detector.reps(), 2);
    }

    #[test]
    fn test_detector_rejects_sagging_body() {
        let mut detector = PushupDetector::new();
        detector.process(&UP);
        assert_eq!(detector.process(&DOWN_SAGGING), Verdict::Misaligned);
        assert_eq!(detector.reps(), 0);
        assert_eq!(detector.stage(), Some(Stage::Down));
    }

    #[test]
    fn test_parse_frames_skips_bad_lines() {
        let content = format!("{}\n\nnot json\n{}\n", frame_json(&UP), frame_json(&DOWN));
        let frames = parse_frames(&content);
        assert_eq!(frames, vec![UP, DOWN]);
    }

    #[test]
    fn test_replay_missing_file() {
        let (tx, _rx) = unbounded_channel();
        let mut replay = PoseReplay::new(PathBuf::from("/nonexistent/pose.jsonl"), 30);
        assert!(matches!(replay.start(tx), Err(CaptureError::ReplayMissing(_))));
        assert!(!replay.is_running());
    }

    #[tokio::test]
    async fn test_replay_emits_reps_and_cues() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for frame in [UP, DOWN, UP, DOWN_SAGGING, UP, DOWN] {
            writeln!(file, "{}", frame_json(&frame)).unwrap();
        }

        let (tx, mut rx) = unbounded_channel();
        let mut replay = PoseReplay::new(file.path().to_path_buf(), 1000);
        replay.start(tx).unwrap();

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                CaptureEvent::Rep(RepSourceKind::Detector),
                CaptureEvent::Cue(MISALIGNED_CUE.to_string()),
                CaptureEvent::Rep(RepSourceKind::Detector),
            ]
        );
    }
}
