use crate::emotion::Emotion;

pub const STABLE_INSIGHT: &str = "Stable: no emotional shift in text or face";

const LOW_CONGRUENCE_BELOW: f64 = 0.4;
const MODERATE_CONGRUENCE_BELOW: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Text,
    Face,
}

impl Modality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Face => "face",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub modality: Modality,
    pub from: Emotion,
    pub to: Emotion,
}

/// `HH:MM:SS`, truncating fractional seconds.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

pub fn describe_changes(at_sec: f64, changes: &[StateChange]) -> String {
    if changes.is_empty() {
        return STABLE_INSIGHT.to_string();
    }
    let modalities = changes
        .iter()
        .map(|change| change.modality.as_str())
        .collect::<Vec<_>>()
        .join(" and ");
    let details = changes
        .iter()
        .map(|change| format!("{} {} -> {}", change.modality.as_str(), change.from, change.to))
        .collect::<Vec<_>>()
        .join("; ");
    format!(
        "Shift at {} in {modalities}: {details}",
        format_timestamp(at_sec)
    )
}

pub fn describe_baseline(at_sec: f64, text: Emotion, face: Emotion) -> String {
    format!(
        "Baseline at {}: text {text}, face {face}",
        format_timestamp(at_sec)
    )
}

pub fn describe_congruence(score: f64, text: Emotion, face: Emotion) -> String {
    if score < LOW_CONGRUENCE_BELOW {
        format!("Low congruence ({score:.1}): face expresses '{face}' while text indicates '{text}'")
    } else if score < MODERATE_CONGRUENCE_BELOW {
        format!("Moderate congruence: face transitioning toward '{face}'")
    } else {
        "High emotional coherence in this segment".to_string()
    }
}
