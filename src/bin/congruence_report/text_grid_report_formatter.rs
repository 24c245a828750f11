use std::fs;
use std::path::{Path, PathBuf};

use congruence_rs::{CongruenceEvent, InterviewReport};
use textgrid::{Interval, TextGrid, Tier, TierType};

const MIN_DURATION_SEC: f64 = 0.001;

pub fn write_textgrid(out_dir: &Path, case_id: &str, report: &InterviewReport) -> Result<PathBuf, String> {
    let out_path = out_dir.join(format!("{case_id}.TextGrid"));
    let max_event_end = report
        .events
        .iter()
        .map(|event| event.end_time_sec)
        .fold(0.0f64, f64::max);
    let xmax = report
        .global_metrics
        .total_duration_sec
        .max(max_event_end)
        .max(MIN_DURATION_SEC);

    let mut textgrid = TextGrid::new(0.0, xmax).map_err(|err| {
        format!(
            "Failed to build TextGrid structure '{}': {err}",
            out_path.display()
        )
    })?;

    let tiers: [(&str, fn(&CongruenceEvent) -> String); 4] = [
        ("text-emotion", |event| event.emotion_text_nlp.to_string()),
        ("face-emotion", |event| event.emotion_facial_mode.to_string()),
        ("congruence", |event| format!("{:.2}", event.congruence_score)),
        ("transcript", |event| event.transcribed_text.clone()),
    ];
    for (name, label_of) in tiers {
        let tier = Tier {
            name: name.to_string(),
            tier_type: TierType::IntervalTier,
            xmin: 0.0,
            xmax,
            intervals: build_intervals(&report.events, xmax, label_of),
            points: Vec::new(),
        };
        textgrid.add_tier(tier).map_err(|err| {
            format!(
                "Failed to add {name} tier for '{}': {err}",
                out_path.display()
            )
        })?;
    }

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create TextGrid output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    textgrid
        .to_file(&out_path, false)
        .map_err(|err| format!("Failed to write TextGrid '{}': {err}", out_path.display()))?;

    Ok(out_path)
}

/// Intervals must not overlap, so each start is clamped to the previous end.
fn build_intervals(
    events: &[CongruenceEvent],
    xmax: f64,
    label_of: fn(&CongruenceEvent) -> String,
) -> Vec<Interval> {
    let mut intervals = Vec::with_capacity(events.len());
    let mut last_end = 0.0f64;
    for event in events {
        let start = event.start_time_sec.min(xmax).max(last_end);
        let end = event.end_time_sec.min(xmax);
        if end <= start {
            continue;
        }
        intervals.push(Interval {
            xmin: start,
            xmax: end,
            text: label_of(event),
        });
        last_end = end;
    }
    intervals
}
