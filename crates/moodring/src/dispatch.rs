//! Orchestrates decode, throttle check, inference, and result assembly for
//! one inbound frame.

use crate::detector::Detector;
use crate::frame;
use crate::frame_sink::FrameSink;
use crate::music::MusicLibrary;
use crate::sessions::{SessionId, SessionRegistry};
use crate::throttle::ThrottleGate;
use chrono::Utc;
use moodproto::ServerMessage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Per-frame processing pipeline.
///
/// Runs on the calling session's critical path: the loop cannot take its
/// next frame until this returns. Per-session throttle state is read and
/// written through the registry entry; the only cross-session state is the
/// process-wide detection counter.
pub struct DetectionDispatcher {
    detector: Arc<dyn Detector>,
    library: Arc<MusicLibrary>,
    gate: ThrottleGate,
    sink: Option<FrameSink>,
    total_detections: AtomicU64,
}

impl DetectionDispatcher {
    pub fn new(detector: Arc<dyn Detector>, library: Arc<MusicLibrary>, gate: ThrottleGate) -> Self {
        Self {
            detector,
            library,
            gate,
            sink: None,
            total_detections: AtomicU64::new(0),
        }
    }

    pub fn with_frame_sink(mut self, sink: FrameSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Detections dispatched since startup, for the stats endpoint.
    pub fn total_detections(&self) -> u64 {
        self.total_detections.load(Ordering::Relaxed)
    }

    /// Identifier of the active model, for the stats endpoint.
    pub fn model_type(&self) -> &str {
        self.detector.model_type()
    }

    /// Process one binary frame payload; returns the replies to send, in
    /// order. Every failure here is recoverable - the session stays open.
    pub async fn process(
        &self,
        registry: &SessionRegistry,
        session_id: &SessionId,
        payload: &[u8],
        now: Instant,
    ) -> Vec<ServerMessage> {
        // 1. Decode. Throttle state is untouched on failure.
        let frame = match frame::decode(payload) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(session = %session_id, error = %e, "frame decode failed");
                return vec![ServerMessage::Error {
                    message: e.to_string(),
                }];
            }
        };

        if let Some(sink) = &self.sink {
            sink.save(session_id, &frame).await;
        }

        // 2. Count the frame and evaluate the gate. `last_detection` advances
        // exactly when a detection is dispatched, success or failure.
        let Some(should_detect) = registry.with_session_mut(session_id, |session| {
            session.frame_count += 1;
            let should_detect = self.gate.should_detect(session.last_detection, now);
            if should_detect {
                session.last_detection = Some(now);
            }
            should_detect
        }) else {
            // Session torn down while the frame was in flight; nothing to say.
            return Vec::new();
        };

        if !should_detect {
            return vec![frame_ack()];
        }

        // 3. Inference.
        self.total_detections.fetch_add(1, Ordering::Relaxed);

        match self.detector.detect(&frame).await {
            Ok(detection) => {
                if !detection.meets_threshold {
                    // Advisory only - the result is forwarded regardless.
                    debug!(
                        session = %session_id,
                        confidence = detection.confidence,
                        "detection below threshold"
                    );
                }

                let song = self.library.recommend(detection.dominant.as_str());
                info!(
                    session = %session_id,
                    mood = %detection.dominant,
                    confidence = detection.confidence,
                    song = song.as_ref().map(|s| s.title.as_str()),
                    "mood detected"
                );

                vec![
                    ServerMessage::MoodDetected {
                        mood: detection.dominant,
                        confidence: detection.confidence,
                        song,
                        timestamp: Utc::now(),
                        all_emotions: detection.scores,
                    },
                    frame_ack(),
                ]
            }
            Err(e) => {
                warn!(session = %session_id, error = %e, "detection failed");
                vec![
                    ServerMessage::Error {
                        message: e.to_string(),
                    },
                    frame_ack(),
                ]
            }
        }
    }
}

fn frame_ack() -> ServerMessage {
    ServerMessage::FrameAck {
        timestamp: Utc::now(),
    }
}
