//! moodproto - Protocol types for the Moodring streaming server
//!
//! This crate defines the JSON messages exchanged between Moodring and its
//! WebSocket clients, plus the domain types shared between the server's
//! collaborators (detectors, recommenders) and the dispatch core.
//!
//! ## Design Principles
//!
//! 1. **Rich types** - Use domain types, not primitives
//! 2. **Option for optional** - Use `Option<T>` instead of nullable JSON
//! 3. **Enums for variants** - Use Rust enums, not string discriminators
//!
//! JSON conversion happens only at the WebSocket edge; internal layers pass
//! the typed values around directly.

pub mod detection;
pub mod emotion;
pub mod messages;

pub use detection::Detection;
pub use emotion::{Emotion, UnknownEmotion};
pub use messages::{ClientMessage, Recommendation, ServerMessage};
