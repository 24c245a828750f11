//! Canonical emotion vocabulary.
//!
//! Recognition models disagree on their label sets (`joy` vs `happy`, English vs
//! Spanish vocabularies, `others` as a catch-all). Every label is normalized into
//! [`Emotion`] once at ingestion so the aggregation, smoothing and scoring stages
//! only ever see the canonical set.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Fear,
    Disgust,
    Surprise,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Valence {
    Positive,
    Negative,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fear,
        Emotion::Disgust,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    /// Normalizes a raw model label.
    ///
    /// Returns `None` for an empty label (no observation). Unrecognized
    /// non-empty labels fall back to [`Emotion::Neutral`].
    pub fn from_label(raw: &str) -> Option<Emotion> {
        let label = raw.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }
        let emotion = match label.as_str() {
            "happy" | "joy" | "happiness" | "alegria" | "alegría" | "felicidad" => Emotion::Happy,
            "sad" | "sadness" | "tristeza" => Emotion::Sad,
            "angry" | "anger" | "enojo" | "ira" => Emotion::Angry,
            "fear" | "miedo" => Emotion::Fear,
            "disgust" | "asco" => Emotion::Disgust,
            "surprise" | "sorpresa" => Emotion::Surprise,
            "neutral" | "others" | "neutro" | "otros" => Emotion::Neutral,
            other => {
                tracing::debug!(label = other, "unrecognized emotion label, using neutral");
                Emotion::Neutral
            }
        };
        Some(emotion)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn valence(self) -> Valence {
        match self {
            Emotion::Happy | Emotion::Surprise => Valence::Positive,
            Emotion::Sad | Emotion::Angry | Emotion::Fear | Emotion::Disgust => Valence::Negative,
            Emotion::Neutral => Valence::Neutral,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
