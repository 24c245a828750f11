use serde::{Deserialize, Serialize};

use crate::types::CongruenceEvent;

const SCORE_DECIMALS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewReport {
    pub interview_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub global_metrics: GlobalMetrics,
    pub events: Vec<CongruenceEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalMetrics {
    pub overall_congruence_score: f64,
    pub total_duration_sec: f64,
}

impl InterviewReport {
    pub fn new(
        interview_id: impl Into<String>,
        video_path: Option<String>,
        events: Vec<CongruenceEvent>,
    ) -> Self {
        Self {
            interview_id: interview_id.into(),
            video_path,
            generated_at: None,
            global_metrics: summarize(&events),
            events,
        }
    }

    pub fn change_point_count(&self) -> usize {
        self.events.iter().filter(|event| event.is_change_point).count()
    }
}

/// Interview-level reduction of the event sequence.
///
/// Mean congruence rounded to two decimals and the end of the last event;
/// both are `0.0` for an empty sequence.
pub fn summarize(events: &[CongruenceEvent]) -> GlobalMetrics {
    let scores = events
        .iter()
        .map(|event| event.congruence_score)
        .collect::<Vec<_>>();
    GlobalMetrics {
        overall_congruence_score: round_to(mean(&scores), SCORE_DECIMALS),
        total_duration_sec: events.last().map_or(0.0, |event| event.end_time_sec),
    }
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::Emotion;

    fn event(end_time_sec: f64, congruence_score: f64, is_change_point: bool) -> CongruenceEvent {
        CongruenceEvent {
            start_time_sec: end_time_sec - 1.0,
            end_time_sec,
            transcribed_text: "hola".to_string(),
            emotion_text_nlp: Emotion::Neutral,
            emotion_facial_mode: Emotion::Neutral,
            emotion_facial_history: Vec::new(),
            congruence_score,
            is_change_point,
            temporal_insight: String::new(),
        }
    }

    #[test]
    fn summarize_empty() {
        let metrics = summarize(&[]);
        assert_eq!(metrics.overall_congruence_score, 0.0);
        assert_eq!(metrics.total_duration_sec, 0.0);
    }

    #[test]
    fn summarize_rounds_mean_and_takes_last_end() {
        let events = vec![event(2.0, 1.0, false), event(4.0, 0.3, true), event(7.5, 0.0, true)];
        let metrics = summarize(&events);
        // (1.0 + 0.3 + 0.0) / 3 = 0.4333..
        assert_eq!(metrics.overall_congruence_score, 0.43);
        assert_eq!(metrics.total_duration_sec, 7.5);
    }

    #[test]
    fn round_to_two_decimals() {
        assert_eq!(round_to(1.234_9, 2), 1.23);
        assert_eq!(round_to(2.0, 2), 2.0);
        assert_eq!(round_to(0.666_6, 2), 0.67);
    }

    #[test]
    fn report_serializes_contract_field_names() {
        let report = InterviewReport::new("INT-video_01", None, vec![event(2.0, 0.7, true)]);
        assert_eq!(report.change_point_count(), 1);
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("video_path").is_none());
        assert!(value.get("generated_at").is_none());
        assert_eq!(value["global_metrics"]["overall_congruence_score"], 0.7);
        assert_eq!(value["global_metrics"]["total_duration_sec"], 2.0);
        let first = &value["events"][0];
        for key in [
            "start_time_sec",
            "end_time_sec",
            "transcribed_text",
            "emotion_text_nlp",
            "emotion_facial_mode",
            "emotion_facial_history",
            "congruence_score",
            "is_change_point",
            "temporal_insight",
        ] {
            assert!(first.get(key).is_some(), "missing event field {key}");
        }
        assert_eq!(first.as_object().map(|o| o.len()), Some(9));
        assert_eq!(first["emotion_text_nlp"], "neutral");
    }
}
