//! Comparison of computed congruence scores against human annotations.

use std::path::Path;

use serde::Serialize;

use crate::alignment::report::InterviewReport;
use crate::error::CongruenceError;
use crate::ingest::table::Table;
use crate::ingest::video_id_from_interview;

const CONTEXT: &str = "parse manual labels";

/// A manual row matches an event whose start lies within this many seconds.
pub const START_TOLERANCE_SEC: f64 = 0.5;
/// Largest score difference still counted as agreement.
pub const SCORE_TOLERANCE: f64 = 0.1;
const FLOAT_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct ManualLabel {
    pub video_id: String,
    pub start_time_sec: f64,
    pub manual_congruence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentComparison {
    pub time: f64,
    pub ai_score: f64,
    pub manual_score: f64,
    pub status: ValidationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    /// Percentage of matched segments whose scores agree.
    pub robustness_accuracy: f64,
    pub segments_validated: usize,
    pub detailed_comparison: Vec<SegmentComparison>,
}

pub fn parse_manual_labels(contents: &str) -> Result<Vec<ManualLabel>, CongruenceError> {
    let table = Table::parse(contents, CONTEXT)?;
    let video_col = table.require_column(&["video_id"], CONTEXT)?;
    let start_col = table.require_column(&["start_time_sec"], CONTEXT)?;
    let score_col = table.require_column(&["manual_congruence"], CONTEXT)?;

    table
        .rows()
        .iter()
        .map(|row| {
            Ok(ManualLabel {
                video_id: row.cell(video_col).to_lowercase(),
                start_time_sec: row.parse_f64(start_col, "start_time_sec", CONTEXT)?,
                manual_congruence: row.parse_f64(score_col, "manual_congruence", CONTEXT)?,
            })
        })
        .collect()
}

pub fn load_manual_labels(path: &Path) -> Result<Vec<ManualLabel>, CongruenceError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| CongruenceError::io("read manual labels", e))?;
    parse_manual_labels(&contents)
}

/// Matches every event to the manual label of the same video whose start is
/// nearest to the event start, within [`START_TOLERANCE_SEC`]. Unmatched events
/// are not counted.
pub fn validate_report(report: &InterviewReport, labels: &[ManualLabel]) -> ValidationSummary {
    let video_id = video_id_from_interview(&report.interview_id);
    let video_labels = labels
        .iter()
        .filter(|label| label.video_id == video_id)
        .collect::<Vec<_>>();

    let mut detailed_comparison = Vec::new();
    let mut matches = 0usize;
    for event in &report.events {
        let start = event.start_time_sec;
        let Some(label) = nearest_label(&video_labels, start) else {
            continue;
        };

        let agrees =
            (event.congruence_score - label.manual_congruence).abs() <= SCORE_TOLERANCE + FLOAT_SLACK;
        if agrees {
            matches += 1;
        }
        detailed_comparison.push(SegmentComparison {
            time: start,
            ai_score: event.congruence_score,
            manual_score: label.manual_congruence,
            status: if agrees {
                ValidationStatus::Valid
            } else {
                ValidationStatus::Invalid
            },
        });
    }

    let segments_validated = detailed_comparison.len();
    let robustness_accuracy = if segments_validated > 0 {
        matches as f64 / segments_validated as f64 * 100.0
    } else {
        0.0
    };
    tracing::info!(
        interview_id = report.interview_id.as_str(),
        segments_validated,
        robustness_accuracy = format!("{robustness_accuracy:.2}"),
        "validation against manual labels finished"
    );

    ValidationSummary {
        robustness_accuracy,
        segments_validated,
        detailed_comparison,
    }
}

/// Closest label within tolerance; equal distances keep sheet order.
fn nearest_label<'a>(labels: &[&'a ManualLabel], start: f64) -> Option<&'a ManualLabel> {
    let mut best: Option<(&ManualLabel, f64)> = None;
    for &label in labels {
        let distance = (label.start_time_sec - start).abs();
        if distance > START_TOLERANCE_SEC + FLOAT_SLACK {
            continue;
        }
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((label, distance));
        }
    }
    best.map(|(label, _)| label)
}
