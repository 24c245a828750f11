use crate::emotion::Emotion;
use crate::types::{FaceObservation, WindowAggregate};

pub trait WindowAggregator: Send + Sync {
    /// Reduces one segment window (time-ordered) to a dominant label.
    /// `prior_face` is the face hidden state before this segment.
    fn aggregate(&self, window: &[FaceObservation], prior_face: Emotion) -> WindowAggregate;

    fn policy_name(&self) -> &'static str;
}

pub trait CongruenceScorer: Send + Sync {
    fn score(&self, emo_text: Emotion, emo_face: Emotion) -> f64;
}

pub trait StateSmoother: Send + Sync {
    fn advance(&self, observation: Option<Emotion>, prior_state: Emotion) -> Emotion;
}
