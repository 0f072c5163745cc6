//! The emotion inference seam.
//!
//! Detectors are swappable collaborators selected via configuration, so the
//! dispatch core never branches on a model tag: production runs against a
//! remote inference service, tests inject deterministic doubles.

mod mock;
mod remote;

pub use mock::MockDetector;
pub use remote::RemoteDetector;

use crate::frame::DecodedFrame;
use async_trait::async_trait;
use moodproto::Detection;
use std::sync::Arc;
use thiserror::Error;

/// Inference collaborator failure. Recoverable: the session reports it and
/// keeps streaming; the throttle window is still consumed.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("inference backend failed: {0}")]
    Backend(String),

    #[error("inference transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("frame re-encode failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Emotion inference on a decoded frame.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Run one inference call. Failure is a value, never a panic.
    async fn detect(&self, frame: &DecodedFrame) -> Result<Detection, DetectorError>;

    /// Identifier of the active model, for the stats endpoint.
    fn model_type(&self) -> &str;
}

/// Build the detector selected by configuration.
pub fn from_config(config: &moodconf::DetectionConfig) -> anyhow::Result<Arc<dyn Detector>> {
    match config.model_type.as_str() {
        "mock" => Ok(Arc::new(MockDetector::new(config.confidence_threshold))),
        "remote" => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                anyhow::anyhow!("detection.endpoint is required for the remote detector")
            })?;
            Ok(Arc::new(RemoteDetector::new(
                endpoint,
                config.confidence_threshold,
            )))
        }
        other => anyhow::bail!("unknown detector model type: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodconf::DetectionConfig;

    #[test]
    fn test_from_config_selects_mock() {
        let detector = from_config(&DetectionConfig::default()).unwrap();
        assert_eq!(detector.model_type(), "mock");
    }

    #[test]
    fn test_from_config_remote_requires_endpoint() {
        let config = DetectionConfig {
            model_type: "remote".to_string(),
            ..Default::default()
        };
        assert!(from_config(&config).is_err());

        let config = DetectionConfig {
            model_type: "remote".to_string(),
            endpoint: Some("http://127.0.0.1:2000".to_string()),
            ..Default::default()
        };
        assert_eq!(from_config(&config).unwrap().model_type(), "remote");
    }

    #[test]
    fn test_from_config_rejects_unknown_model() {
        let config = DetectionConfig {
            model_type: "deepface".to_string(),
            ..Default::default()
        };
        assert!(from_config(&config).is_err());
    }
}
