//! Loaders for the two external collaborator outputs and the manual label sheet.

mod faces;
mod segments;
pub(crate) mod table;

pub use faces::{load_face_series, parse_face_series};
pub use segments::{load_segments, parse_segments, DEFAULT_OPEN_SEGMENT_SEC};

const INTERVIEW_ID_PREFIX: &str = "INT-";

/// Interview identifier derived from a video file stem.
pub fn interview_id_for(video_stem: &str) -> String {
    format!("{INTERVIEW_ID_PREFIX}{video_stem}")
}

/// Video identifier used by the manual label sheet.
pub fn video_id_from_interview(interview_id: &str) -> String {
    let stripped = interview_id.replacen(INTERVIEW_ID_PREFIX, "", 1);
    stripped
        .split('-')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Maps model confidences to [0, 1]; values above 1 are read as percentages.
pub(crate) fn normalize_confidence(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let fraction = if value > 1.0 { value / 100.0 } else { value };
    fraction.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interview_ids_round_trip() {
        let id = interview_id_for("Video_03");
        assert_eq!(id, "INT-Video_03");
        assert_eq!(video_id_from_interview(&id), "video_03");
        assert_eq!(video_id_from_interview("INT-video_04-retake"), "video_04");
    }

    #[test]
    fn normalize_confidence_handles_percentages() {
        assert_eq!(normalize_confidence(0.25), 0.25);
        assert_eq!(normalize_confidence(87.5), 0.875);
        assert_eq!(normalize_confidence(-1.0), 0.0);
        assert_eq!(normalize_confidence(f64::NAN), 0.0);
        assert_eq!(normalize_confidence(1000.0), 1.0);
    }
}
