//! The closed set of emotion labels the detector can report.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the fixed emotion labels.
///
/// Lowercase on the wire, both as values and as keys of score maps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprise,
    Fear,
    Disgust,
    Neutral,
}

impl Emotion {
    /// Every label, in wire order.
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprise,
        Emotion::Fear,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprise => "surprise",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label outside the fixed emotion set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emotion label: {0}")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    /// Case-insensitive parse, matching how collaborators report labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "angry" => Ok(Emotion::Angry),
            "surprise" => Ok(Emotion::Surprise),
            "fear" => Ok(Emotion::Fear),
            "disgust" => Ok(Emotion::Disgust),
            "neutral" => Ok(Emotion::Neutral),
            _ => Err(UnknownEmotion(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_labels() {
        for emotion in Emotion::ALL {
            let parsed: Emotion = emotion.as_str().parse().unwrap();
            assert_eq!(parsed, emotion);
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("HAPPY".parse::<Emotion>().unwrap(), Emotion::Happy);
        assert_eq!("Surprise".parse::<Emotion>().unwrap(), Emotion::Surprise);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "melancholy".parse::<Emotion>().unwrap_err();
        assert_eq!(err, UnknownEmotion("melancholy".to_string()));
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&Emotion::Fear).unwrap();
        assert_eq!(json, "\"fear\"");
    }

    #[test]
    fn test_usable_as_map_key() {
        use std::collections::BTreeMap;

        let mut scores = BTreeMap::new();
        scores.insert(Emotion::Happy, 0.9_f32);
        scores.insert(Emotion::Neutral, 0.1_f32);

        let json = serde_json::to_string(&scores).unwrap();
        assert!(json.contains("\"happy\":"));

        let back: BTreeMap<Emotion, f32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scores);
    }
}
