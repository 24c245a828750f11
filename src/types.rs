use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;

/// One transcribed utterance with its text-derived emotion.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSegment {
    /// Seconds interval is [start_time, end_time), i.e. start inclusive/end exclusive.
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    /// `None` when the sentiment classifier produced no usable label.
    pub emotion_label: Option<Emotion>,
    pub confidence: f64,
}

/// Facial-emotion classification of one sampled video frame.
///
/// Frames without a detected face are absent from the series, never zero-valued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceObservation {
    pub timestamp_sec: f64,
    pub emotion_label: Emotion,
    pub confidence: f64,
}

/// Vote over the face observations that fall inside one segment window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowAggregate {
    pub dominant: Emotion,
    /// Share of the window's (possibly weighted) votes won by `dominant`.
    /// Distinct from the per-frame model confidences.
    pub vote_fraction: f64,
    /// Raw per-frame labels in time order.
    pub history: Vec<Emotion>,
}

impl WindowAggregate {
    pub fn empty() -> Self {
        Self {
            dominant: Emotion::Neutral,
            vote_fraction: 0.0,
            history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CongruenceEvent {
    pub start_time_sec: f64,
    pub end_time_sec: f64,
    pub transcribed_text: String,
    /// Smoothed text hidden state after this segment.
    pub emotion_text_nlp: Emotion,
    /// Smoothed face hidden state after this segment.
    pub emotion_facial_mode: Emotion,
    pub emotion_facial_history: Vec<Emotion>,
    pub congruence_score: f64,
    pub is_change_point: bool,
    pub temporal_insight: String,
}
