//! Session lifecycle: identity, per-connection state, and the registry that
//! owns both.

mod registry;
mod types;

pub use registry::SessionRegistry;
pub use types::{Session, SessionId, SessionStatus};
