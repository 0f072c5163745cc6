//! Optional persistence of decoded frames, off the dispatch contract.

use crate::frame::DecodedFrame;
use crate::sessions::SessionId;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Writes decoded frames to disk as JPEG when enabled in config.
///
/// Best-effort: failures are logged and never affect the session.
pub struct FrameSink {
    dir: PathBuf,
}

impl FrameSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn save(&self, session_id: &SessionId, frame: &DecodedFrame) {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S_%f");
        let path = self.dir.join(format!("{session_id}_{timestamp}.jpg"));

        let bytes = match frame.encode_jpeg() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(session = %session_id, error = %e, "frame encode failed, not saved");
                return;
            }
        };

        match tokio::fs::write(&path, bytes).await {
            Ok(()) => debug!(session = %session_id, path = %path.display(), "frame saved"),
            Err(e) => warn!(session = %session_id, error = %e, "frame write failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame;
    use image::RgbImage;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_save_writes_a_jpeg() {
        let dir = tempfile::TempDir::new().unwrap();
        let sink = FrameSink::new(dir.path());

        let image = RgbImage::from_pixel(4, 4, image::Rgb([200, 100, 50]));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        let frame = frame::decode(buf.get_ref()).unwrap();

        sink.save(&SessionId::new("test-session"), &frame).await;

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].as_ref().unwrap().file_name();
        let name = name.to_string_lossy();
        assert!(name.starts_with("test-session_"));
        assert!(name.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_save_into_missing_dir_does_not_panic() {
        let sink = FrameSink::new("/nonexistent/moodring-frames");

        let image = RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        let frame = frame::decode(buf.get_ref()).unwrap();

        sink.save(&SessionId::new("s"), &frame).await;
    }
}
