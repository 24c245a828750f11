use crate::config::SyncConfig;
use crate::error::CongruenceError;
use crate::pipeline::defaults::{window_aggregator_for, OverrideSmoother, ValenceLadderScorer};
use crate::pipeline::runtime::{Synchronizer, SynchronizerParts};
use crate::pipeline::traits::{CongruenceScorer, StateSmoother, WindowAggregator};

pub struct SynchronizerBuilder {
    config: SyncConfig,
    window_aggregator: Option<Box<dyn WindowAggregator>>,
    scorer: Option<Box<dyn CongruenceScorer>>,
    smoother: Option<Box<dyn StateSmoother>>,
}

impl SynchronizerBuilder {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            window_aggregator: None,
            scorer: None,
            smoother: None,
        }
    }

    pub fn with_window_aggregator(mut self, window_aggregator: Box<dyn WindowAggregator>) -> Self {
        self.window_aggregator = Some(window_aggregator);
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn CongruenceScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_smoother(mut self, smoother: Box<dyn StateSmoother>) -> Self {
        self.smoother = Some(smoother);
        self
    }

    pub fn build(self) -> Result<Synchronizer, CongruenceError> {
        self.config.validate()?;

        let window_aggregator = self
            .window_aggregator
            .unwrap_or_else(|| window_aggregator_for(&self.config));
        tracing::debug!(
            window_policy = window_aggregator.policy_name(),
            first_segment = ?self.config.first_segment,
            insight_style = ?self.config.insight_style,
            "synchronizer configured"
        );

        Ok(Synchronizer::from_parts(SynchronizerParts {
            first_segment: self.config.first_segment,
            insight_style: self.config.insight_style,
            timestamp_decimals: self.config.timestamp_decimals,
            window_aggregator,
            scorer: self.scorer.unwrap_or_else(|| Box::new(ValenceLadderScorer)),
            smoother: self.smoother.unwrap_or_else(|| Box::new(OverrideSmoother)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::WindowPolicy;
    use crate::emotion::Emotion;
    use crate::types::{FaceObservation, SpeechSegment, WindowAggregate};

    use super::*;

    struct AlwaysAngry;

    impl WindowAggregator for AlwaysAngry {
        fn aggregate(&self, window: &[FaceObservation], _prior_face: Emotion) -> WindowAggregate {
            WindowAggregate {
                dominant: Emotion::Angry,
                vote_fraction: 1.0,
                history: window.iter().map(|obs| obs.emotion_label).collect(),
            }
        }

        fn policy_name(&self) -> &'static str {
            "always_angry"
        }
    }

    struct FlatScorer;

    impl CongruenceScorer for FlatScorer {
        fn score(&self, _emo_text: Emotion, _emo_face: Emotion) -> f64 {
            0.5
        }
    }

    fn segment(start_time: f64, end_time: f64, label: Emotion) -> SpeechSegment {
        SpeechSegment {
            start_time,
            end_time,
            text: "texto".to_string(),
            emotion_label: Some(label),
            confidence: 0.9,
        }
    }

    #[test]
    fn builder_defaults_to_config_policy() {
        let config = SyncConfig {
            window_policy: WindowPolicy::WeightedRecencyMode,
            ..SyncConfig::default()
        };
        let synchronizer = SynchronizerBuilder::new(config).build().expect("build");
        assert_eq!(synchronizer.window_policy(), "weighted_recency_mode");
    }

    #[test]
    fn build_fails_on_invalid_config() {
        let config = SyncConfig {
            inertia_bonus: -1.0,
            ..SyncConfig::default()
        };
        assert!(SynchronizerBuilder::new(config).build().is_err());
    }

    #[test]
    fn overrides_are_used() {
        let synchronizer = SynchronizerBuilder::new(SyncConfig::default())
            .with_window_aggregator(Box::new(AlwaysAngry))
            .with_scorer(Box::new(FlatScorer))
            .build()
            .expect("build");
        assert_eq!(synchronizer.window_policy(), "always_angry");

        let events = synchronizer
            .synchronize(&[segment(0.0, 1.0, Emotion::Happy)], &[])
            .unwrap();
        assert_eq!(events[0].emotion_facial_mode, Emotion::Angry);
        assert_eq!(events[0].congruence_score, 0.5);
    }
}
