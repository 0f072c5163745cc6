//! Moodring - streams live video frames in over a WebSocket, runs throttled
//! emotion inference on them, and streams music recommendations back out.
//!
//! The core is the session/stream manager: connection lifecycle
//! ([`sessions`]), frame decoding ([`frame`]), time-based throttling of
//! inference calls ([`throttle`]), dispatch to the inference collaborator
//! ([`dispatch`], [`detector`]), and the outbound result protocol
//! (`moodproto`, served by [`web`]).

pub mod detector;
pub mod dispatch;
pub mod frame;
pub mod frame_sink;
pub mod music;
pub mod sessions;
pub mod telemetry;
pub mod throttle;
pub mod web;
