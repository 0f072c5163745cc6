//! Per-connection session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Unique identifier for one logical client connection.
///
/// Never reused while the session is registered; a reconnecting peer always
/// gets a fresh id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generate a new unique session ID.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Registered, handshake not yet acknowledged.
    Connecting,
    /// Streaming frames.
    Open,
    /// Torn down; the registry entry is gone.
    Closed,
}

/// State for one streaming connection.
///
/// Owned exclusively by the registry entry and mutated only from the
/// session's own loop.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub status: SessionStatus,
    pub connected_at: DateTime<Utc>,
    /// Frames successfully decoded on this connection.
    pub frame_count: u64,
    /// When the last detection was dispatched. `None` until the first
    /// dispatch, so the first frame always passes the throttle gate.
    pub last_detection: Option<Instant>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            status: SessionStatus::Connecting,
            connected_at: Utc::now(),
            frame_count: 0,
            last_detection: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }
}
