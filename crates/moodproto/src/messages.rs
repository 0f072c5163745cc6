//! JSON messages exchanged over the `/stream` WebSocket.
//!
//! Server messages are tagged with a `type` field so clients can dispatch on
//! it without peeking at the rest of the payload. Timestamps are ISO-8601.

use crate::emotion::Emotion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A music recommendation drawn from the per-mood candidate set.
///
/// `mood` echoes the queried mood (lowercased), which may differ from the
/// pool the song was drawn from when the lookup fell back to `neutral`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub artist: String,
    pub url: String,
    pub mood: String,
}

/// Messages sent from the server to a streaming client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Handshake acknowledgement, always the first message after accept.
    Connected { client_id: String, message: String },
    /// Acknowledges receipt of one decoded frame.
    FrameAck { timestamp: DateTime<Utc> },
    /// One inference result. `song` is `null` when no recommendation exists;
    /// below-threshold results are forwarded, not filtered.
    MoodDetected {
        mood: Emotion,
        confidence: f32,
        song: Option<Recommendation>,
        timestamp: DateTime<Utc>,
        all_emotions: BTreeMap<Emotion, f32>,
    },
    /// A recoverable per-frame failure. The session stays open.
    Error { message: String },
    /// Reply to a client ping.
    Pong,
}

/// Text control messages recognized from clients.
///
/// Anything that fails to parse as one of these variants is silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
}
