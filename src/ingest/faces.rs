use std::path::Path;

use crate::emotion::Emotion;
use crate::error::CongruenceError;
use crate::ingest::normalize_confidence;
use crate::ingest::table::Table;
use crate::types::FaceObservation;

const CONTEXT: &str = "parse face series";

/// Reads the per-frame face table (`timestamp_sec`, `emotion`, optional
/// `confidence` and `frame`). Rows with an empty label are frames where no face
/// was detected and are skipped.
pub fn parse_face_series(contents: &str) -> Result<Vec<FaceObservation>, CongruenceError> {
    let table = Table::parse(contents, CONTEXT)?;
    let timestamp_col = table.require_column(&["timestamp_sec", "timestamp"], CONTEXT)?;
    let emotion_col = table.require_column(
        &["emotion", "emotion_label", "dominant_emotion"],
        CONTEXT,
    )?;
    let confidence_col = table.column(&["confidence", "confidence_score"]);

    let mut observations = Vec::with_capacity(table.rows().len());
    let mut skipped = 0usize;
    for row in table.rows() {
        let Some(emotion_label) = Emotion::from_label(row.cell(emotion_col)) else {
            skipped += 1;
            continue;
        };
        let timestamp_sec = row.parse_f64(timestamp_col, "timestamp_sec", CONTEXT)?;
        if !timestamp_sec.is_finite() || timestamp_sec < 0.0 {
            return Err(CongruenceError::parse(
                CONTEXT,
                row.line,
                format!("timestamp_sec must be finite and >= 0, got {timestamp_sec}"),
            ));
        }
        let confidence = match confidence_col {
            Some(col) if !row.cell(col).is_empty() => {
                normalize_confidence(row.parse_f64(col, "confidence", CONTEXT)?)
            }
            _ => 0.0,
        };
        observations.push(FaceObservation {
            timestamp_sec,
            emotion_label,
            confidence,
        });
    }

    if skipped > 0 {
        tracing::debug!(skipped, "face series rows without a label were skipped");
    }
    Ok(observations)
}

pub fn load_face_series(path: &Path) -> Result<Vec<FaceObservation>, CongruenceError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| CongruenceError::io("read face series", e))?;
    parse_face_series(&contents)
}
