//! Registry owning all live sessions.

use super::types::{Session, SessionId, SessionStatus};
use dashmap::DashMap;
use tracing::info;

/// Owns the set of live sessions and their per-connection state.
///
/// Backed by a concurrent keyed map: insert/remove/lookup at distinct keys
/// proceed concurrently without a global lock, and no lock is held across a
/// session's processing. Each entry is mutated only from its own loop.
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create and register a new session in the `Connecting` state.
    pub fn connect(&self) -> SessionId {
        let id = SessionId::generate();
        self.sessions.insert(id.clone(), Session::new(id.clone()));
        info!(session = %id, active = self.len(), "session registered");
        id
    }

    /// Promote a session to `Open` once the handshake has been sent.
    pub fn open(&self, id: &SessionId) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.status = SessionStatus::Open;
        }
    }

    /// Remove all state for a session. Idempotent: removing an id that is
    /// already gone is a no-op.
    pub fn disconnect(&self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!(session = %id, active = self.len(), "session removed");
        }
        removed
    }

    /// A point-in-time copy of a session's state.
    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions.get(id).map(|s| s.value().clone())
    }

    /// Run `f` against a session's mutable state. Returns `None` when the
    /// session is no longer registered (e.g. torn down mid-dispatch).
    pub fn with_session_mut<R>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        self.sessions.get_mut(id).map(|mut s| f(&mut s))
    }

    /// Number of registered sessions, observable via the stats endpoint.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_connect_registers_distinct_ids() {
        let registry = SessionRegistry::new();
        let a = registry.connect();
        let b = registry.connect();

        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&a).unwrap().status, SessionStatus::Connecting);
    }

    #[test]
    fn test_open_promotes_session() {
        let registry = SessionRegistry::new();
        let id = registry.connect();
        registry.open(&id);
        assert!(registry.get(&id).unwrap().is_open());
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let registry = SessionRegistry::new();
        let id = registry.connect();

        assert!(registry.disconnect(&id));
        assert!(!registry.disconnect(&id));
        assert_eq!(registry.len(), 0);
        assert!(registry.get(&id).is_none());
    }

    #[test]
    fn test_reconnect_gets_fresh_state() {
        let registry = SessionRegistry::new();
        let first = registry.connect();
        registry.with_session_mut(&first, |s| {
            s.frame_count = 42;
            s.last_detection = Some(std::time::Instant::now());
        });
        registry.disconnect(&first);

        let second = registry.connect();
        assert_ne!(first, second);
        let session = registry.get(&second).unwrap();
        assert_eq!(session.frame_count, 0);
        assert!(session.last_detection.is_none());
    }

    #[test]
    fn test_with_session_mut_missing_session() {
        let registry = SessionRegistry::new();
        let result = registry.with_session_mut(&SessionId::new("gone"), |s| s.frame_count);
        assert!(result.is_none());
    }

    #[test]
    fn test_concurrent_connect_disconnect() {
        let registry = Arc::new(SessionRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let id = registry.connect();
                        registry.open(&id);
                        registry.disconnect(&id);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(registry.is_empty());
    }
}
