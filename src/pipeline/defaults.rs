use crate::alignment::smoothing::advance;
use crate::alignment::valence::score;
use crate::alignment::window::{mode_vote, recency_weighted_vote, RecencyWeights};
use crate::config::{SyncConfig, WindowPolicy};
use crate::emotion::Emotion;
use crate::pipeline::traits::{CongruenceScorer, StateSmoother, WindowAggregator};
use crate::types::{FaceObservation, WindowAggregate};

pub struct ModeWindowAggregator;

impl WindowAggregator for ModeWindowAggregator {
    fn aggregate(&self, window: &[FaceObservation], _prior_face: Emotion) -> WindowAggregate {
        mode_vote(window)
    }

    fn policy_name(&self) -> &'static str {
        WindowPolicy::SimpleMode.as_str()
    }
}

pub struct RecencyWeightedAggregator {
    pub weights: RecencyWeights,
}

impl WindowAggregator for RecencyWeightedAggregator {
    fn aggregate(&self, window: &[FaceObservation], prior_face: Emotion) -> WindowAggregate {
        recency_weighted_vote(window, prior_face, self.weights)
    }

    fn policy_name(&self) -> &'static str {
        WindowPolicy::WeightedRecencyMode.as_str()
    }
}

pub struct ValenceLadderScorer;

impl CongruenceScorer for ValenceLadderScorer {
    fn score(&self, emo_text: Emotion, emo_face: Emotion) -> f64 {
        score(emo_text, emo_face)
    }
}

pub struct OverrideSmoother;

impl StateSmoother for OverrideSmoother {
    fn advance(&self, observation: Option<Emotion>, prior_state: Emotion) -> Emotion {
        advance(observation, prior_state)
    }
}

pub(crate) fn window_aggregator_for(config: &SyncConfig) -> Box<dyn WindowAggregator> {
    match config.window_policy {
        WindowPolicy::SimpleMode => Box::new(ModeWindowAggregator),
        WindowPolicy::WeightedRecencyMode => Box::new(RecencyWeightedAggregator {
            weights: RecencyWeights {
                recency_weight: config.recency_weight,
                inertia_bonus: config.inertia_bonus,
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(timestamp_sec: f64, emotion_label: Emotion) -> FaceObservation {
        FaceObservation {
            timestamp_sec,
            emotion_label,
            confidence: 1.0,
        }
    }

    #[test]
    fn mode_aggregator_ignores_prior() {
        let window = vec![obs(0.0, Emotion::Sad), obs(0.5, Emotion::Happy)];
        let aggregator = ModeWindowAggregator;
        assert_eq!(
            aggregator.aggregate(&window, Emotion::Happy),
            mode_vote(&window)
        );
        assert_eq!(aggregator.policy_name(), "simple_mode");
    }

    #[test]
    fn window_aggregator_for_follows_policy() {
        let config = SyncConfig {
            window_policy: WindowPolicy::WeightedRecencyMode,
            ..SyncConfig::default()
        };
        let aggregator = window_aggregator_for(&config);
        assert_eq!(aggregator.policy_name(), "weighted_recency_mode");

        // Equal counts; the later happy frame wins under recency weighting.
        let window = vec![obs(0.0, Emotion::Sad), obs(0.5, Emotion::Happy)];
        let result = aggregator.aggregate(&window, Emotion::Neutral);
        assert_eq!(result.dominant, Emotion::Happy);
        assert_eq!(
            window_aggregator_for(&SyncConfig::default())
                .aggregate(&window, Emotion::Neutral)
                .dominant,
            Emotion::Sad
        );
    }

    #[test]
    fn scorer_and_smoother_delegate() {
        assert_eq!(ValenceLadderScorer.score(Emotion::Happy, Emotion::Angry), 0.0);
        assert_eq!(ValenceLadderScorer.score(Emotion::Sad, Emotion::Fear), 0.7);
        assert_eq!(OverrideSmoother.advance(None, Emotion::Sad), Emotion::Sad);
        assert_eq!(
            OverrideSmoother.advance(Some(Emotion::Happy), Emotion::Sad),
            Emotion::Happy
        );
    }
}
