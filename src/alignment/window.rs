//! Interval aggregation of the facial time series.
//!
//! Windows are half-open, `[start, end)`, so a frame sitting exactly on the
//! boundary between two adjacent segments is counted once, by the later one.

use crate::emotion::Emotion;
use crate::types::{FaceObservation, WindowAggregate};

/// Parameters of the weighted recency vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecencyWeights {
    /// Frame `i` of `n` weighs `1 + recency_weight * (i + 1) / n`.
    pub recency_weight: f64,
    /// Multiplier for frames whose label equals the prior face state.
    pub inertia_bonus: f64,
}

/// Dominant face label over `[start, end)` of an unordered face series.
///
/// Observations inside the window are put in time order before voting (stable,
/// equal timestamps keep input order), so `history` is chronological and ties
/// go to the label encountered first in time.
pub fn aggregate(face_series: &[FaceObservation], start: f64, end: f64) -> WindowAggregate {
    let mut window: Vec<FaceObservation> = face_series
        .iter()
        .filter(|obs| start <= obs.timestamp_sec && obs.timestamp_sec < end)
        .copied()
        .collect();
    window.sort_by(|a, b| a.timestamp_sec.total_cmp(&b.timestamp_sec));
    mode_vote(&window)
}

/// One vote per frame. An empty window degrades to neutral with zero fraction.
pub fn mode_vote(window: &[FaceObservation]) -> WindowAggregate {
    tally(window, |_, _| 1.0)
}

/// Vote where later frames and frames agreeing with `prior` weigh more.
///
/// `window` must already be in time order.
pub fn recency_weighted_vote(
    window: &[FaceObservation],
    prior: Emotion,
    weights: RecencyWeights,
) -> WindowAggregate {
    let n = window.len() as f64;
    tally(window, |idx, label| {
        let mut weight = 1.0 + weights.recency_weight * (idx + 1) as f64 / n;
        if label == prior {
            weight *= weights.inertia_bonus;
        }
        weight
    })
}

fn tally(window: &[FaceObservation], weight_of: impl Fn(usize, Emotion) -> f64) -> WindowAggregate {
    if window.is_empty() {
        return WindowAggregate::empty();
    }

    // First-encounter order doubles as the tie-break order.
    let mut votes: Vec<(Emotion, f64)> = Vec::with_capacity(Emotion::ALL.len());
    let mut history = Vec::with_capacity(window.len());
    let mut total = 0.0;
    for (idx, obs) in window.iter().enumerate() {
        let weight = weight_of(idx, obs.emotion_label);
        total += weight;
        history.push(obs.emotion_label);
        match votes.iter_mut().find(|(label, _)| *label == obs.emotion_label) {
            Some((_, acc)) => *acc += weight,
            None => votes.push((obs.emotion_label, weight)),
        }
    }

    let mut dominant = votes[0];
    for &candidate in &votes[1..] {
        if candidate.1 > dominant.1 {
            dominant = candidate;
        }
    }

    WindowAggregate {
        dominant: dominant.0,
        vote_fraction: if total > 0.0 { dominant.1 / total } else { 0.0 },
        history,
    }
}

/// Face series sorted once per run, so each segment window is a binary search.
#[derive(Debug, Clone, Default)]
pub struct FaceTimeline {
    observations: Vec<FaceObservation>,
}

impl FaceTimeline {
    pub fn new(mut observations: Vec<FaceObservation>) -> Self {
        let before = observations.len();
        observations.retain(|obs| obs.timestamp_sec.is_finite());
        if observations.len() < before {
            tracing::warn!(
                dropped = before - observations.len(),
                "face series contained non-finite timestamps"
            );
        }
        observations.sort_by(|a, b| a.timestamp_sec.total_cmp(&b.timestamp_sec));
        Self { observations }
    }

    /// Observations with `start <= timestamp_sec < end`, in time order.
    pub fn window(&self, start: f64, end: f64) -> &[FaceObservation] {
        if !(end > start) {
            return &[];
        }
        let lo = self
            .observations
            .partition_point(|obs| obs.timestamp_sec < start);
        let hi = self.observations.partition_point(|obs| obs.timestamp_sec < end);
        &self.observations[lo..hi]
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
