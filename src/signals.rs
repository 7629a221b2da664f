//! Haptic/notification signals.
//!
//! A terminal has no vibration motor, so signals are logged and optionally
//! rung on the terminal bell.

use std::io::Write;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Medium impact pulse for a counted rep
    RepPulse,
    /// Success notification for a finished workout
    WorkoutComplete,
}

pub trait SignalSink: Send {
    fn emit(&mut self, signal: Signal);
}

/// Writes BEL to the terminal for each signal when enabled
pub struct TerminalSignals<W: Write + Send> {
    out: W,
    bell: bool,
}

impl<W: Write + Send> TerminalSignals<W> {
    pub fn new(out: W, bell: bool) -> Self {
        Self { out, bell }
    }
}

impl<W: Write + Send> SignalSink for TerminalSignals<W> {
    fn emit(&mut self, signal: Signal) {
        debug!(?signal, "signal");
        if !self.bell {
            return;
        }
        let rings = match signal {
            Signal::RepPulse => 1,
            Signal::WorkoutComplete => 2,
        };
        for _ in 0..rings {
            let _ = self.out.write_all(b"\x07");
        }
        let _ = self.out.flush();
    }
}

/// Sink that remembers what it was sent
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingSignals {
    pub seen: std::sync::Arc<std::sync::Mutex<Vec<Signal>>>,
}

#[cfg(test)]
impl RecordingSignals {
    pub fn signals(&self) -> Vec<Signal> {
        self.seen.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SignalSink for RecordingSignals {
    fn emit(&mut self, signal: Signal) {
        self.seen.lock().unwrap().push(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_rings_per_signal() {
        let mut sink = TerminalSignals::new(Vec::new(), true);
        sink.emit(Signal::RepPulse);
        sink.emit(Signal::WorkoutComplete);
        assert_eq!(sink.out, b"\x07\x07\x07");
    }

    #[test]
    fn test_bell_disabled_is_silent() {
        let mut sink = TerminalSignals::new(Vec::new(), false);
        sink.emit(Signal::WorkoutComplete);
        assert!(sink.out.is_empty());
    }

    #[test]
    fn test_recording_sink_shares_log() {
        let sink = RecordingSignals::default();
        let mut handle = sink.clone();
        handle.emit(Signal::RepPulse);
        assert_eq!(sink.signals(), vec![Signal::RepPulse]);
    }
}
