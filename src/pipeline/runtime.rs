use crate::alignment::insight::{
    describe_baseline, describe_changes, describe_congruence, Modality, StateChange,
};
use crate::alignment::report::{round_to, InterviewReport};
use crate::alignment::window::FaceTimeline;
use crate::config::{FirstSegmentPolicy, InsightStyle};
use crate::emotion::Emotion;
use crate::error::CongruenceError;
use crate::pipeline::traits::{CongruenceScorer, StateSmoother, WindowAggregator};
use crate::types::{CongruenceEvent, FaceObservation, SpeechSegment};

pub struct Synchronizer {
    first_segment: FirstSegmentPolicy,
    insight_style: InsightStyle,
    timestamp_decimals: u32,
    window_aggregator: Box<dyn WindowAggregator>,
    scorer: Box<dyn CongruenceScorer>,
    smoother: Box<dyn StateSmoother>,
}

pub(crate) struct SynchronizerParts {
    pub first_segment: FirstSegmentPolicy,
    pub insight_style: InsightStyle,
    pub timestamp_decimals: u32,
    pub window_aggregator: Box<dyn WindowAggregator>,
    pub scorer: Box<dyn CongruenceScorer>,
    pub smoother: Box<dyn StateSmoother>,
}

/// Running label per modality; the only memory carried between segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HiddenState {
    text: Emotion,
    face: Emotion,
}

impl HiddenState {
    const INITIAL: HiddenState = HiddenState {
        text: Emotion::Neutral,
        face: Emotion::Neutral,
    };

    fn changes_to(&self, next: &HiddenState) -> Vec<StateChange> {
        let mut changes = Vec::with_capacity(2);
        if next.text != self.text {
            changes.push(StateChange {
                modality: Modality::Text,
                from: self.text,
                to: next.text,
            });
        }
        if next.face != self.face {
            changes.push(StateChange {
                modality: Modality::Face,
                from: self.face,
                to: next.face,
            });
        }
        changes
    }
}

impl Synchronizer {
    pub(crate) fn from_parts(parts: SynchronizerParts) -> Self {
        Self {
            first_segment: parts.first_segment,
            insight_style: parts.insight_style,
            timestamp_decimals: parts.timestamp_decimals,
            window_aggregator: parts.window_aggregator,
            scorer: parts.scorer,
            smoother: parts.smoother,
        }
    }

    pub fn window_policy(&self) -> &'static str {
        self.window_aggregator.policy_name()
    }

    /// Produces one event per segment, in segment order.
    ///
    /// Segments must be finite, start at or after zero, have `end >= start` and
    /// non-decreasing start times. An empty face series is not an error: every
    /// window then degrades to neutral.
    pub fn synchronize(
        &self,
        segments: &[SpeechSegment],
        face_series: &[FaceObservation],
    ) -> Result<Vec<CongruenceEvent>, CongruenceError> {
        if segments.is_empty() {
            tracing::warn!("no speech segments to synchronize");
            return Ok(Vec::new());
        }
        validate_segments(segments)?;
        if face_series.is_empty() {
            tracing::warn!(
                segments = segments.len(),
                "face series is empty; every window degrades to neutral"
            );
        }

        let timeline = FaceTimeline::new(face_series.to_vec());
        // Window extraction has no cross-segment state; the recurrence below does.
        let windows = collect_windows(&timeline, segments);

        let mut state = HiddenState::INITIAL;
        let mut events = Vec::with_capacity(segments.len());
        for (idx, (segment, window)) in segments.iter().zip(windows).enumerate() {
            let aggregate = self.window_aggregator.aggregate(window, state.face);
            let next = HiddenState {
                text: self.smoother.advance(segment.emotion_label, state.text),
                face: self.smoother.advance(Some(aggregate.dominant), state.face),
            };
            let changes = state.changes_to(&next);
            let is_baseline = idx == 0 && self.first_segment == FirstSegmentPolicy::Baseline;
            let is_change_point = !is_baseline && !changes.is_empty();
            let congruence_score = self.scorer.score(next.text, next.face);

            let temporal_insight = match self.insight_style {
                InsightStyle::Transitions if is_baseline => {
                    describe_baseline(segment.start_time, next.text, next.face)
                }
                InsightStyle::Transitions => describe_changes(segment.start_time, &changes),
                InsightStyle::Congruence if is_change_point => format!(
                    "{}. {}",
                    describe_changes(segment.start_time, &changes),
                    describe_congruence(congruence_score, next.text, next.face)
                ),
                InsightStyle::Congruence => {
                    describe_congruence(congruence_score, next.text, next.face)
                }
            };

            tracing::debug!(
                segment = idx,
                start_time = segment.start_time,
                end_time = segment.end_time,
                window_frames = window.len(),
                face_mode = aggregate.dominant.as_str(),
                vote_fraction = format!("{:.3}", aggregate.vote_fraction),
                text_state = next.text.as_str(),
                face_state = next.face.as_str(),
                congruence_score,
                is_change_point,
                "synchronizer: segment fused"
            );

            events.push(CongruenceEvent {
                start_time_sec: round_to(segment.start_time, self.timestamp_decimals),
                end_time_sec: round_to(segment.end_time, self.timestamp_decimals),
                transcribed_text: segment.text.clone(),
                emotion_text_nlp: next.text,
                emotion_facial_mode: next.face,
                emotion_facial_history: aggregate.history,
                congruence_score,
                is_change_point,
                temporal_insight,
            });
            state = next;
        }

        Ok(events)
    }

    /// Synchronizes one interview and reduces it to a report.
    pub fn analyze(
        &self,
        interview_id: &str,
        video_path: Option<String>,
        segments: &[SpeechSegment],
        face_series: &[FaceObservation],
    ) -> Result<InterviewReport, CongruenceError> {
        let events = self.synchronize(segments, face_series)?;
        let report = InterviewReport::new(interview_id, video_path, events);
        tracing::info!(
            interview_id,
            window_policy = self.window_policy(),
            events = report.events.len(),
            change_points = report.change_point_count(),
            overall_congruence_score = report.global_metrics.overall_congruence_score,
            total_duration_sec = report.global_metrics.total_duration_sec,
            "interview synchronized"
        );
        Ok(report)
    }
}

#[cfg(feature = "parallel")]
fn collect_windows<'a>(
    timeline: &'a FaceTimeline,
    segments: &[SpeechSegment],
) -> Vec<&'a [FaceObservation]> {
    use rayon::prelude::*;

    segments
        .par_iter()
        .map(|segment| timeline.window(segment.start_time, segment.end_time))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn collect_windows<'a>(
    timeline: &'a FaceTimeline,
    segments: &[SpeechSegment],
) -> Vec<&'a [FaceObservation]> {
    segments
        .iter()
        .map(|segment| timeline.window(segment.start_time, segment.end_time))
        .collect()
}

fn validate_segments(segments: &[SpeechSegment]) -> Result<(), CongruenceError> {
    let mut previous_start = 0.0f64;
    for (idx, segment) in segments.iter().enumerate() {
        if !segment.start_time.is_finite() || !segment.end_time.is_finite() {
            return Err(CongruenceError::invalid_input(format!(
                "segment {idx} has non-finite timestamps [{}, {})",
                segment.start_time, segment.end_time
            )));
        }
        if segment.start_time < 0.0 {
            return Err(CongruenceError::invalid_input(format!(
                "segment {idx} starts before zero: {}",
                segment.start_time
            )));
        }
        if segment.end_time < segment.start_time {
            return Err(CongruenceError::invalid_input(format!(
                "segment {idx} ends before it starts: [{}, {})",
                segment.start_time, segment.end_time
            )));
        }
        if segment.start_time < previous_start {
            return Err(CongruenceError::invalid_input(format!(
                "segment {idx} is out of order: starts at {} after a segment starting at {previous_start}",
                segment.start_time
            )));
        }
        previous_start = segment.start_time;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::alignment::insight::STABLE_INSIGHT;
    use crate::config::SyncConfig;
    use crate::pipeline::builder::SynchronizerBuilder;

    use super::*;

    fn segment(start_time: f64, end_time: f64, label: Option<Emotion>) -> SpeechSegment {
        SpeechSegment {
            start_time,
            end_time,
            text: format!("segment at {start_time}"),
            emotion_label: label,
            confidence: 0.8,
        }
    }

    fn obs(timestamp_sec: f64, emotion_label: Emotion) -> FaceObservation {
        FaceObservation {
            timestamp_sec,
            emotion_label,
            confidence: 0.9,
        }
    }

    fn synchronizer(first_segment: FirstSegmentPolicy) -> Synchronizer {
        SynchronizerBuilder::new(SyncConfig {
            first_segment,
            ..SyncConfig::default()
        })
        .build()
        .expect("build synchronizer")
    }

    #[test]
    fn empty_segments_give_empty_events() {
        let events = synchronizer(FirstSegmentPolicy::Baseline)
            .synchronize(&[], &[obs(1.0, Emotion::Happy)])
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn happy_then_sad_scenario() {
        let segments = [
            segment(0.0, 2.0, Some(Emotion::Happy)),
            segment(2.0, 4.0, Some(Emotion::Sad)),
        ];
        let faces = [obs(1.0, Emotion::Happy), obs(3.0, Emotion::Sad)];

        let events = synchronizer(FirstSegmentPolicy::Baseline)
            .synchronize(&segments, &faces)
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].emotion_text_nlp, Emotion::Happy);
        assert_eq!(events[0].emotion_facial_mode, Emotion::Happy);
        assert_eq!(events[0].congruence_score, 1.0);
        assert!(!events[0].is_change_point);
        assert!(events[0].temporal_insight.starts_with("Baseline"));
        assert_eq!(events[1].emotion_text_nlp, Emotion::Sad);
        assert_eq!(events[1].emotion_facial_mode, Emotion::Sad);
        assert_eq!(events[1].congruence_score, 1.0);
        assert!(events[1].is_change_point);
        assert!(events[1].temporal_insight.contains("text and face"));

        let events = synchronizer(FirstSegmentPolicy::CompareToNeutral)
            .synchronize(&segments, &faces)
            .unwrap();
        assert!(events[0].is_change_point);
        assert!(events[1].is_change_point);
    }

    #[test]
    fn empty_window_degrades_to_neutral() {
        let segments = [
            segment(0.0, 2.0, Some(Emotion::Angry)),
            segment(2.0, 4.0, Some(Emotion::Neutral)),
        ];
        let faces = [obs(10.0, Emotion::Happy)];
        let events = synchronizer(FirstSegmentPolicy::Baseline)
            .synchronize(&segments, &faces)
            .unwrap();
        assert_eq!(events[0].emotion_facial_mode, Emotion::Neutral);
        assert!(events[0].emotion_facial_history.is_empty());
        assert_eq!(events[0].congruence_score, 0.3);
        assert_eq!(events[1].congruence_score, 1.0);
    }

    #[test]
    fn absent_text_label_keeps_previous_state() {
        let segments = [
            segment(0.0, 1.0, Some(Emotion::Fear)),
            segment(1.0, 2.0, None),
        ];
        let faces = [obs(0.5, Emotion::Fear), obs(1.5, Emotion::Fear)];
        let events = synchronizer(FirstSegmentPolicy::Baseline)
            .synchronize(&segments, &faces)
            .unwrap();
        assert_eq!(events[1].emotion_text_nlp, Emotion::Fear);
        assert!(!events[1].is_change_point);
        assert_eq!(events[1].temporal_insight, STABLE_INSIGHT);
    }

    #[test]
    fn timestamps_are_rounded() {
        let segments = [segment(0.123_456, 1.987_654, Some(Emotion::Happy))];
        let events = synchronizer(FirstSegmentPolicy::Baseline)
            .synchronize(&segments, &[])
            .unwrap();
        assert_eq!(events[0].start_time_sec, 0.12);
        assert_eq!(events[0].end_time_sec, 1.99);
    }

    #[test]
    fn congruence_insight_style() {
        let synchronizer = SynchronizerBuilder::new(SyncConfig {
            insight_style: InsightStyle::Congruence,
            ..SyncConfig::default()
        })
        .build()
        .unwrap();
        let events = synchronizer
            .synchronize(
                &[segment(0.0, 1.0, Some(Emotion::Happy))],
                &[obs(0.5, Emotion::Angry)],
            )
            .unwrap();
        assert_eq!(events[0].congruence_score, 0.0);
        assert!(events[0].temporal_insight.starts_with("Low congruence"));
    }

    #[test]
    fn congruence_insight_names_changed_modalities() {
        let synchronizer = SynchronizerBuilder::new(SyncConfig {
            insight_style: InsightStyle::Congruence,
            ..SyncConfig::default()
        })
        .build()
        .unwrap();
        let segments = [
            segment(0.0, 2.0, Some(Emotion::Happy)),
            segment(2.0, 4.0, Some(Emotion::Happy)),
            segment(4.0, 6.0, Some(Emotion::Happy)),
        ];
        let faces = [
            obs(1.0, Emotion::Happy),
            obs(3.0, Emotion::Happy),
            obs(5.0, Emotion::Angry),
        ];
        let events = synchronizer.synchronize(&segments, &faces).unwrap();

        assert!(!events[1].is_change_point);
        assert_eq!(events[1].temporal_insight, "High emotional coherence in this segment");

        assert!(events[2].is_change_point);
        let insight = &events[2].temporal_insight;
        assert!(insight.starts_with("Shift at 00:00:04 in face: face happy -> angry. "));
        assert!(insight.ends_with("Low congruence (0.0): face expresses 'angry' while text indicates 'happy'"));
    }

    #[test]
    fn rejects_out_of_order_segments() {
        let segments = [
            segment(2.0, 3.0, Some(Emotion::Happy)),
            segment(1.0, 2.0, Some(Emotion::Sad)),
        ];
        let result = synchronizer(FirstSegmentPolicy::Baseline).synchronize(&segments, &[]);
        assert!(matches!(result, Err(CongruenceError::InvalidInput { .. })));
    }

    #[test]
    fn rejects_inverted_and_negative_segments() {
        let sync = synchronizer(FirstSegmentPolicy::Baseline);
        assert!(sync
            .synchronize(&[segment(3.0, 2.0, None)], &[])
            .is_err());
        assert!(sync
            .synchronize(&[segment(-1.0, 2.0, None)], &[])
            .is_err());
        assert!(sync
            .synchronize(&[segment(0.0, f64::INFINITY, None)], &[])
            .is_err());
    }

    #[test]
    fn analyze_builds_report() {
        let segments = [
            segment(0.0, 2.0, Some(Emotion::Happy)),
            segment(2.0, 4.5, Some(Emotion::Sad)),
        ];
        let faces = [obs(1.0, Emotion::Happy), obs(3.0, Emotion::Neutral)];
        let report = synchronizer(FirstSegmentPolicy::Baseline)
            .analyze("INT-video_01", Some("video_01.mp4".to_string()), &segments, &faces)
            .unwrap();
        assert_eq!(report.interview_id, "INT-video_01");
        assert_eq!(report.events.len(), 2);
        // 1.0 and 0.3
        assert_eq!(report.global_metrics.overall_congruence_score, 0.65);
        assert_eq!(report.global_metrics.total_duration_sec, 4.5);
    }
}
