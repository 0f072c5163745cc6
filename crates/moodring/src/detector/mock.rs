//! Randomized detector for development and demos.

use super::{Detector, DetectorError};
use crate::frame::DecodedFrame;
use async_trait::async_trait;
use moodproto::{Detection, Emotion};
use rand::Rng;
use std::collections::BTreeMap;

/// Picks a random mood with confidence in `[0.70, 0.95)`.
///
/// The dominant label always carries the highest score so the result is
/// internally consistent.
pub struct MockDetector {
    confidence_threshold: f32,
}

impl MockDetector {
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            confidence_threshold,
        }
    }
}

#[async_trait]
impl Detector for MockDetector {
    async fn detect(&self, _frame: &DecodedFrame) -> Result<Detection, DetectorError> {
        let mut rng = rand::thread_rng();

        let dominant = Emotion::ALL[rng.gen_range(0..Emotion::ALL.len())];
        let confidence = rng.gen_range(0.70..0.95);

        let mut scores = BTreeMap::new();
        for emotion in Emotion::ALL {
            scores.insert(emotion, rng.gen_range(0.0..confidence));
        }
        scores.insert(dominant, confidence);

        Ok(Detection {
            dominant,
            confidence,
            scores,
            model_type: "mock".to_string(),
            meets_threshold: confidence >= self.confidence_threshold,
        })
    }

    fn model_type(&self) -> &str {
        "mock"
    }
}
