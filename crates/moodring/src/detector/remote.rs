//! HTTP client for a remote inference sidecar.

use super::{Detector, DetectorError};
use crate::frame::DecodedFrame;
use async_trait::async_trait;
use moodproto::{Detection, Emotion};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Calls an inference service over HTTP.
///
/// The frame is re-encoded as JPEG and POSTed to `{endpoint}/detect`; the
/// service answers with JSON:
///
/// ```json
/// {"success": true, "dominant_emotion": "happy", "confidence": 0.83,
///  "emotions": {"happy": 0.83, "sad": 0.02, ...}, "model_type": "deepface"}
/// ```
///
/// Scores and confidence are expected in `[0, 1]`. Labels outside the fixed
/// emotion set are dropped; missing labels are filled with zero so the score
/// map is always complete.
pub struct RemoteDetector {
    endpoint: String,
    confidence_threshold: f32,
    client: reqwest::Client,
}

impl RemoteDetector {
    pub fn new(endpoint: impl Into<String>, confidence_threshold: f32) -> Self {
        Self {
            endpoint: endpoint.into(),
            confidence_threshold,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Detector for RemoteDetector {
    async fn detect(&self, frame: &DecodedFrame) -> Result<Detection, DetectorError> {
        let jpeg = frame.encode_jpeg()?;

        let response = self
            .client
            .post(format!("{}/detect", self.endpoint))
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(jpeg)
            .send()
            .await?
            .error_for_status()?;

        let wire: DetectResponse = response.json().await?;
        convert(wire, self.confidence_threshold)
    }

    fn model_type(&self) -> &str {
        "remote"
    }
}

/// Wire shape of the sidecar's response.
#[derive(Debug, Deserialize)]
struct DetectResponse {
    success: bool,
    #[serde(default)]
    dominant_emotion: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    emotions: Option<HashMap<String, f32>>,
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn convert(wire: DetectResponse, confidence_threshold: f32) -> Result<Detection, DetectorError> {
    if !wire.success {
        return Err(DetectorError::Backend(
            wire.error
                .unwrap_or_else(|| "unspecified backend failure".to_string()),
        ));
    }

    let dominant: Emotion = wire
        .dominant_emotion
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: moodproto::UnknownEmotion| DetectorError::Backend(e.to_string()))?;

    let confidence = wire
        .confidence
        .ok_or_else(|| DetectorError::Backend("missing confidence".to_string()))?;

    // Every label present; unrecognized keys from the backend are dropped.
    let mut scores = BTreeMap::new();
    for emotion in Emotion::ALL {
        scores.insert(emotion, 0.0);
    }
    for (label, score) in wire.emotions.unwrap_or_default() {
        if let Ok(emotion) = label.parse::<Emotion>() {
            scores.insert(emotion, score);
        }
    }

    Ok(Detection {
        dominant,
        confidence,
        scores,
        model_type: wire.model_type.unwrap_or_else(|| "remote".to_string()),
        meets_threshold: confidence >= confidence_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success_wire() -> DetectResponse {
        serde_json::from_str(
            r#"{"success": true, "dominant_emotion": "HAPPY", "confidence": 0.83,
                "emotions": {"happy": 0.83, "sad": 0.02, "sparkly": 0.5},
                "model_type": "deepface"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_convert_success() {
        let detection = convert(success_wire(), 0.6).unwrap();
        assert_eq!(detection.dominant, Emotion::Happy);
        assert!((detection.confidence - 0.83).abs() < f32::EPSILON);
        assert_eq!(detection.model_type, "deepface");
        assert!(detection.meets_threshold);

        // All labels present, unknown "sparkly" dropped, missing filled with 0
        assert_eq!(detection.scores.len(), Emotion::ALL.len());
        assert_eq!(detection.scores[&Emotion::Fear], 0.0);
    }

    #[test]
    fn test_convert_below_threshold_is_still_a_success() {
        let detection = convert(success_wire(), 0.9).unwrap();
        assert!(!detection.meets_threshold);
    }

    #[test]
    fn test_convert_backend_failure() {
        let wire: DetectResponse =
            serde_json::from_str(r#"{"success": false, "error": "no face found"}"#).unwrap();
        match convert(wire, 0.6) {
            Err(DetectorError::Backend(message)) => assert_eq!(message, "no face found"),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_unknown_dominant_label_fails() {
        let wire: DetectResponse = serde_json::from_str(
            r#"{"success": true, "dominant_emotion": "sparkly", "confidence": 0.9}"#,
        )
        .unwrap();
        assert!(matches!(convert(wire, 0.6), Err(DetectorError::Backend(_))));
    }
}
