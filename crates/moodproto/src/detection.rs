//! The result of one emotion inference call.

use crate::emotion::Emotion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A successful detection, immutable once produced.
///
/// `scores` carries an entry for every label in [`Emotion::ALL`]; the values
/// need not sum to 1. `meets_threshold` is advisory metadata derived from the
/// configured confidence threshold - it never gates delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// The single highest-scoring label for this inference call.
    pub dominant: Emotion,
    /// Confidence in the dominant label, in `[0, 1]`.
    pub confidence: f32,
    /// Per-label scores, all labels present.
    pub scores: BTreeMap<Emotion, f32>,
    /// Identifier of the model that produced this result.
    pub model_type: String,
    /// Whether `confidence` reached the configured threshold.
    pub meets_threshold: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_serializes_scores_by_label() {
        let mut scores = BTreeMap::new();
        for emotion in Emotion::ALL {
            scores.insert(emotion, 0.0);
        }
        scores.insert(Emotion::Happy, 0.8);

        let detection = Detection {
            dominant: Emotion::Happy,
            confidence: 0.8,
            scores,
            model_type: "mock".to_string(),
            meets_threshold: true,
        };

        let json = serde_json::to_value(&detection).unwrap();
        assert_eq!(json["dominant"], "happy");
        assert!((json["scores"]["happy"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert_eq!(json["scores"].as_object().unwrap().len(), Emotion::ALL.len());
    }
}
