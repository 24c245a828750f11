use std::path::Path;

use serde::Deserialize;

use crate::emotion::Emotion;
use crate::error::CongruenceError;
use crate::ingest::normalize_confidence;
use crate::types::SpeechSegment;

/// Whisper-style chunks may lack an end timestamp; they are given this duration.
pub const DEFAULT_OPEN_SEGMENT_SEC: f64 = 1.0;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SegmentDocument {
    Flat(Vec<RawSegment>),
    Assembled { audio_analysis: AudioAnalysis },
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    start_time: Option<f64>,
    end_time: Option<f64>,
    #[serde(default)]
    text: String,
    #[serde(alias = "emotion_label")]
    emotion: Option<String>,
    #[serde(alias = "confidence_score")]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AudioAnalysis {
    #[serde(default)]
    transcribed_text: Vec<TranscribedText>,
    text_emotions: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct TranscribedText {
    #[serde(default)]
    text: String,
}

/// Parses transcription + sentiment output.
///
/// Accepts either a flat list of segments or the assembled
/// `{"audio_analysis": {"transcribed_text": [...], "text_emotions": [...]}}`
/// document, whose two lists are paired by index.
pub fn parse_segments(json: &str) -> Result<Vec<SpeechSegment>, CongruenceError> {
    let document: SegmentDocument =
        serde_json::from_str(json).map_err(|e| CongruenceError::json("parse speech segments", e))?;

    let raw_segments = match document {
        SegmentDocument::Flat(segments) => segments,
        SegmentDocument::Assembled { audio_analysis } => {
            let AudioAnalysis {
                transcribed_text,
                text_emotions,
            } = audio_analysis;
            text_emotions
                .into_iter()
                .enumerate()
                .map(|(idx, mut segment)| {
                    if segment.text.is_empty() {
                        if let Some(transcribed) = transcribed_text.get(idx) {
                            segment.text = transcribed.text.clone();
                        }
                    }
                    segment
                })
                .collect()
        }
    };

    raw_segments
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| into_segment(idx, raw))
        .collect()
}

pub fn load_segments(path: &Path) -> Result<Vec<SpeechSegment>, CongruenceError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| CongruenceError::io("read speech segments", e))?;
    parse_segments(&data)
}

fn into_segment(idx: usize, raw: RawSegment) -> Result<SpeechSegment, CongruenceError> {
    let start_time = raw.start_time.ok_or_else(|| {
        CongruenceError::invalid_input(format!("segment {idx} has no start_time"))
    })?;
    let end_time = raw
        .end_time
        .unwrap_or(start_time + DEFAULT_OPEN_SEGMENT_SEC);
    Ok(SpeechSegment {
        start_time,
        end_time,
        text: raw.text.trim().to_string(),
        emotion_label: raw.emotion.as_deref().and_then(Emotion::from_label),
        confidence: raw.confidence.map(normalize_confidence).unwrap_or(0.0),
    })
}
