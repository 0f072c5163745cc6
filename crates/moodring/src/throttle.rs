//! Time-window gating of expensive inference calls.

use std::time::{Duration, Instant};

/// Decides whether enough time has passed since a session's last detection.
///
/// The gate itself is stateless; per-session state lives on the `Session`
/// record. The caller updates `last_detection` only after actually
/// dispatching a detection attempt, so a failed detection still consumes its
/// throttle window rather than retrying on the next frame.
#[derive(Debug, Clone, Copy)]
pub struct ThrottleGate {
    interval: Duration,
}

impl ThrottleGate {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `true` when `now - last >= interval`. A session that has never
    /// detected (`last == None`) always passes.
    pub fn should_detect(&self, last: Option<Instant>, now: Instant) -> bool {
        match last {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_detection_always_passes() {
        let gate = ThrottleGate::from_millis(30);
        assert!(gate.should_detect(None, Instant::now()));
    }

    #[test]
    fn test_gate_closed_inside_window() {
        let gate = ThrottleGate::from_millis(30);
        let t0 = Instant::now();
        assert!(!gate.should_detect(Some(t0), t0 + Duration::from_millis(10)));
        assert!(!gate.should_detect(Some(t0), t0 + Duration::from_millis(29)));
    }

    #[test]
    fn test_gate_opens_at_exactly_the_interval() {
        let gate = ThrottleGate::from_millis(30);
        let t0 = Instant::now();
        assert!(gate.should_detect(Some(t0), t0 + Duration::from_millis(30)));
        assert!(gate.should_detect(Some(t0), t0 + Duration::from_millis(35)));
    }

    // interval = 30ms, frames at t = 0, 10, 20, 35: detections at 0 and 35 only.
    #[test]
    fn test_frame_sequence() {
        let gate = ThrottleGate::from_millis(30);
        let t0 = Instant::now();
        let mut last = None;
        let mut dispatched = Vec::new();

        for offset_ms in [0_u64, 10, 20, 35] {
            let now = t0 + Duration::from_millis(offset_ms);
            if gate.should_detect(last, now) {
                last = Some(now);
                dispatched.push(offset_ms);
            }
        }

        assert_eq!(dispatched, vec![0, 35]);
    }
}
